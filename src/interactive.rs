//! Interactive menu driving the validator

use anyhow::Result;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::{normalize_extensions, validated_threads, Settings, MAX_THREADS};
use crate::core::{BarReporter, NoOpReporter, ProgressReporter, WorkerPool};
use crate::reporting::{save_reports, write_summary};
use crate::scanner::{load_file_list, scan_directories, scan_directory};

const RULE_WIDTH: usize = 60;

/// One interactive session: menu loop, prompts and batch runs.
///
/// Generic over its input and output so it can be driven by stdin/stdout
/// or by in-memory buffers.
pub struct Session<R, W> {
    input: R,
    out: W,
    settings: Settings,
    output_dir: PathBuf,
    cancel: Arc<AtomicBool>,
    show_progress: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W, settings: Settings) -> Self {
        Self {
            input,
            out,
            settings,
            output_dir: PathBuf::from("."),
            cancel: Arc::new(AtomicBool::new(false)),
            show_progress: true,
        }
    }

    /// Directory that saved reports are written to
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Share the interrupt flag set by the Ctrl-C handler
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the menu until the user exits or input ends
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("\nChoose an option (1-6): ")? else {
                writeln!(self.out)?;
                return Ok(());
            };

            if self.cancel.swap(false, Ordering::SeqCst) {
                let answer = self.prompt("\nInterrupted. Exit the program? (y/n): ")?;
                if answer.map_or(true, |a| a.eq_ignore_ascii_case("y")) {
                    writeln!(self.out, "Exiting")?;
                    return Ok(());
                }
                continue;
            }

            let outcome = match choice.as_str() {
                "1" => self.check_directory(),
                "2" => self.check_directories(),
                "3" => self.check_file_list(),
                "4" => self.check_manual_paths(),
                "5" => self.edit_settings(),
                "6" => {
                    writeln!(self.out, "\nGoodbye!")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.out, "\nInvalid option, please enter 1-6")?;
                    continue;
                }
            };

            if let Err(e) = outcome {
                log::debug!("Menu action failed: {:?}", e);
                writeln!(self.out, "\nError: {:#}", e)?;
            }
            self.prompt("\nPress Enter to continue...")?;
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.out, "\n{}", rule)?;
        writeln!(self.out, "File Validator v{}", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.out, "Checks that files exist, are non-empty and readable")?;
        writeln!(self.out, "{}", rule)?;
        writeln!(self.out, "  1. Check a directory")?;
        writeln!(self.out, "  2. Check several directories")?;
        writeln!(self.out, "  3. Check paths from a list file (.txt)")?;
        writeln!(self.out, "  4. Enter file paths manually")?;
        writeln!(self.out, "  5. Settings (threads, extension filter, recursion)")?;
        writeln!(self.out, "  6. Exit")?;
        Ok(())
    }

    fn check_directory(&mut self) -> Result<()> {
        let dir = self
            .prompt("\nDirectory to check (Enter for current directory): ")?
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| ".".to_string());

        writeln!(self.out, "\nAbout to check directory: {}", dir)?;
        writeln!(self.out, "Settings: {}", self.settings)?;
        if !self.confirm()? {
            return Ok(());
        }

        let files = scan_directory(Path::new(&dir), &self.settings)?;
        writeln!(self.out, "Found {} file(s)", files.len())?;
        self.run_batch(&files)
    }

    fn check_directories(&mut self) -> Result<()> {
        writeln!(self.out, "\nEnter directories (one per line, empty line to finish):")?;
        let mut dirs = Vec::new();
        for line in self.read_block()? {
            let dir = PathBuf::from(&line);
            if dir.is_dir() {
                dirs.push(dir);
            } else {
                writeln!(self.out, "Warning: directory does not exist: {}", line)?;
            }
        }
        if dirs.is_empty() {
            writeln!(self.out, "No valid directories entered")?;
            return Ok(());
        }

        writeln!(self.out, "\nAbout to check {} directories", dirs.len())?;
        writeln!(self.out, "Settings: {}", self.settings)?;
        if !self.confirm()? {
            return Ok(());
        }

        let files = scan_directories(&dirs, &self.settings);
        writeln!(self.out, "Found {} file(s)", files.len())?;
        self.run_batch(&files)
    }

    fn check_file_list(&mut self) -> Result<()> {
        let list = self
            .prompt("\nPath of the file list (.txt): ")?
            .unwrap_or_default();
        if list.is_empty() || !Path::new(&list).exists() {
            writeln!(self.out, "File list does not exist or no path was given")?;
            return Ok(());
        }

        writeln!(self.out, "\nAbout to check paths listed in: {}", list)?;
        writeln!(self.out, "Settings: threads={}", self.settings.threads)?;
        if !self.confirm()? {
            return Ok(());
        }

        let loaded = load_file_list(Path::new(&list))?;
        for (line, path) in &loaded.missing {
            writeln!(self.out, "Warning: line {}: file does not exist: {}", line, path)?;
        }
        writeln!(
            self.out,
            "Loaded {} existing path(s) from '{}'",
            loaded.paths.len(),
            list
        )?;
        self.run_batch(&loaded.paths)
    }

    fn check_manual_paths(&mut self) -> Result<()> {
        writeln!(self.out, "\nEnter file paths (one per line, empty line to finish):")?;
        let paths = self.read_block()?;
        if paths.is_empty() {
            writeln!(self.out, "No file paths entered")?;
            return Ok(());
        }

        writeln!(self.out, "\nAbout to check {} file(s)", paths.len())?;
        writeln!(self.out, "Settings: threads={}", self.settings.threads)?;
        if !self.confirm()? {
            return Ok(());
        }
        self.run_batch(&paths)
    }

    fn edit_settings(&mut self) -> Result<()> {
        let mut settings = self.settings.clone();
        writeln!(self.out, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(self.out, "Settings")?;
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;

        let threads = self
            .prompt(&format!(
                "Worker threads (1-{}, current {}): ",
                MAX_THREADS, settings.threads
            ))?
            .unwrap_or_default();
        if !threads.is_empty() {
            match threads.parse::<usize>() {
                Ok(n) => match validated_threads(n) {
                    Some(n) => settings.threads = n,
                    None => writeln!(
                        self.out,
                        "Thread count must be between 1 and {}, keeping {}",
                        MAX_THREADS, settings.threads
                    )?,
                },
                Err(_) => writeln!(
                    self.out,
                    "Invalid number, keeping {}",
                    settings.threads
                )?,
            }
        }

        let extensions = self
            .prompt("Extension filter (space separated, e.g. .pdf .docx; empty for all): ")?
            .unwrap_or_default();
        settings.extensions = normalize_extensions(extensions.split_whitespace());

        let recursive = self
            .prompt("Recurse into subdirectories? (y/n, default y): ")?
            .unwrap_or_default();
        settings.recursive = !recursive.eq_ignore_ascii_case("n");

        self.settings = settings;
        writeln!(self.out, "Settings saved: {}", self.settings)?;
        Ok(())
    }

    fn run_batch(&mut self, paths: &[String]) -> Result<()> {
        if paths.is_empty() {
            writeln!(self.out, "Nothing to check")?;
            return Ok(());
        }

        let reporter: Arc<dyn ProgressReporter> = if self.show_progress {
            Arc::new(BarReporter::new())
        } else {
            Arc::new(NoOpReporter)
        };

        let pool = WorkerPool::new(self.settings.threads)
            .with_reporter(reporter)
            .with_cancellation(self.cancel.clone());

        writeln!(
            self.out,
            "\nChecking {} file(s) with {} worker(s)...",
            paths.len(),
            pool.workers().min(paths.len())
        )?;
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))?;
        self.out.flush()?;

        // Only an interrupt raised while the batch runs may cancel it
        self.cancel.store(false, Ordering::SeqCst);
        let outcome = pool.run(paths);

        // The interrupt only stops the batch, not the session
        self.cancel.store(false, Ordering::SeqCst);
        write_summary(&mut self.out, &outcome)?;

        let save = self
            .prompt("\nSave reports? (y/n, default y): ")?
            .unwrap_or_default();
        if !save.eq_ignore_ascii_case("n") {
            let saved = save_reports(&self.output_dir, &outcome)?;
            writeln!(self.out, "\nReports saved:")?;
            writeln!(self.out, "Text report: {}", saved.text.display())?;
            writeln!(self.out, "JSON report: {}", saved.json.display())?;
        }
        Ok(())
    }

    fn confirm(&mut self) -> Result<bool> {
        let answer = self.prompt("Start checking? (y/n): ")?.unwrap_or_default();
        Ok(answer.eq_ignore_ascii_case("y"))
    }

    /// Read trimmed lines until an empty line or end of input
    fn read_block(&mut self) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines)
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.out, "{}", message)?;
        self.out.flush()?;
        self.read_line()
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
