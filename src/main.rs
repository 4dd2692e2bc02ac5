use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use file_validator_rs::config::{validated_threads, Settings, DEFAULT_THREADS, MAX_THREADS};
use file_validator_rs::core::{BarReporter, NoOpReporter, ProgressReporter};
use file_validator_rs::interactive::Session;
use file_validator_rs::logging::init_logging;
use file_validator_rs::prelude::*;

/// Exit code after a forced quit: 128 + SIGINT
const EXIT_CODE_INTERRUPTED: i32 = 130;

#[derive(Parser)]
#[command(name = "file_validator_rs")]
#[command(
    about = "Check that files exist, are non-empty and readable",
    long_about = "Check that files exist, are non-empty and readable.\n\n\
                  Without paths or --file-list an interactive menu is started."
)]
struct Cli {
    /// Files or directories to check
    paths: Vec<PathBuf>,

    /// Read paths to check from a text file (one per line, '#' for comments)
    #[arg(short = 'l', long)]
    file_list: Option<PathBuf>,

    /// Number of worker threads (1-16)
    #[arg(short, long, default_value_t = DEFAULT_THREADS)]
    workers: usize,

    /// Only check files with these extensions (repeatable, e.g. -e pdf -e .docx)
    #[arg(short, long = "ext")]
    extensions: Vec<String>,

    /// Do not descend into subdirectories
    #[arg(long)]
    no_recursive: bool,

    /// Directory that reports are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Save text and JSON reports (always offered in interactive mode)
    #[arg(long)]
    report: bool,

    /// Run in batch mode (no progress bar)
    #[arg(long)]
    batch: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if validated_threads(cli.workers).is_none() {
        log::warn!(
            "Worker count must be between 1 and {}, using {}",
            MAX_THREADS,
            DEFAULT_THREADS
        );
    }
    let settings = Settings::default()
        .with_threads(cli.workers)
        .with_extensions(&cli.extensions)
        .with_recursive(!cli.no_recursive);

    // Set up graceful shutdown handler
    let shutdown_requested = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown_requested.clone();
    ctrlc::set_handler(move || {
        // A second interrupt before the first was handled ends the process
        if shutdown_flag.swap(true, Ordering::SeqCst) {
            eprintln!("\nInterrupted");
            std::process::exit(EXIT_CODE_INTERRUPTED);
        }
        eprintln!("\n⚠️  Interrupt received. Finishing current files (Ctrl-C again to quit)...");
    })
    .context("Error setting Ctrl-C handler")?;

    if cli.paths.is_empty() && cli.file_list.is_none() {
        let stdin = io::stdin();
        // Unlocked stdout: the progress bar writes to it from worker threads
        let mut session = Session::new(stdin.lock(), io::stdout(), settings)
            .with_output_dir(&cli.output_dir)
            .with_cancellation(shutdown_requested)
            .with_progress(!cli.batch);
        return session.run();
    }

    let paths = collect_paths(&cli, &settings)?;
    if paths.is_empty() {
        println!("No files to check.");
        return Ok(());
    }

    println!("File Validator");
    println!("Using {} worker thread(s), {}", settings.threads, settings);
    println!("Checking {} file(s)", paths.len());
    println!();

    let reporter: Arc<dyn ProgressReporter> = if cli.batch {
        Arc::new(NoOpReporter)
    } else {
        Arc::new(BarReporter::new())
    };

    let outcome = WorkerPool::new(settings.threads)
        .with_reporter(reporter)
        .with_cancellation(shutdown_requested)
        .run(&paths);

    write_summary(&mut io::stdout(), &outcome)?;

    if cli.report {
        let saved = save_reports(&cli.output_dir, &outcome)?;
        println!("Text report saved to: {}", saved.text.display());
        println!("JSON report saved to: {}", saved.json.display());
    }

    Ok(())
}

/// Expand the command-line inputs into a flat list of file paths
fn collect_paths(cli: &Cli, settings: &Settings) -> Result<Vec<String>> {
    let mut paths = Vec::new();

    for path in &cli.paths {
        if path.is_dir() {
            paths.extend(scan_directory(path, settings)?);
        } else {
            // Plain files and missing paths are checked as given
            paths.push(path.to_string_lossy().into_owned());
        }
    }

    if let Some(list_path) = &cli.file_list {
        if !list_path.exists() {
            bail!("File list '{}' does not exist", list_path.display());
        }
        let loaded = load_file_list(list_path)?;
        for (line, path) in &loaded.missing {
            eprintln!("Warning: line {}: file does not exist: {}", line, path);
        }
        paths.extend(loaded.paths);
    }

    Ok(paths)
}
