//! Report writing functionality

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::summary::Summary;
use crate::core::{BatchOutcome, ValidationResult};

/// Paths of the reports written for one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReports {
    pub text: PathBuf,
    pub json: PathBuf,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    timestamp: String,
    summary: Summary,
    interrupted: bool,
    results: &'a [ValidationResult],
}

/// Base file name shared by the text and JSON report of one run
pub fn report_stem(now: &DateTime<Local>) -> String {
    format!("file_check_report_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Write the plain-text report
///
/// # Arguments
/// * `output_path` - Path to output file
/// * `outcome` - Finished batch
/// * `generated` - Timestamp printed in the header
pub fn write_text_report(
    output_path: &Path,
    outcome: &BatchOutcome,
    generated: &DateTime<Local>,
) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create report '{}'", output_path.display()))?;
    let mut file = BufWriter::new(file);
    let summary = Summary::from_outcome(outcome);

    writeln!(file, "File Check Report")?;
    writeln!(file, "{}", "=".repeat(60))?;
    writeln!(file)?;
    writeln!(file, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"))?;
    if outcome.interrupted {
        writeln!(
            file,
            "Interrupted: {} of {} file(s) checked",
            outcome.results.len(),
            outcome.total
        )?;
    }
    writeln!(file, "Total files: {}", summary.total_files)?;
    writeln!(file, "Good files: {}", summary.good_files)?;
    writeln!(file, "Problem files: {}", summary.bad_files)?;
    writeln!(file, "Elapsed: {:.1} s", summary.total_time)?;
    writeln!(file)?;

    if summary.bad_files > 0 {
        writeln!(file, "Problem file details:")?;
        writeln!(file, "{}", "-".repeat(60))?;
        for result in outcome.results.iter().filter(|r| !r.readable) {
            writeln!(file, "File: {}", result.path)?;
            writeln!(file, "Error: {}", result.reason().unwrap_or_default())?;
            writeln!(file, "Size: {} bytes", result.size)?;
            writeln!(file, "{}", "-".repeat(40))?;
        }
    }

    writeln!(file)?;
    writeln!(file, "End of report")?;
    write!(file, "{}", "=".repeat(60))?;
    file.flush()?;

    Ok(())
}

/// Write the structured JSON report
pub fn write_json_report(
    output_path: &Path,
    outcome: &BatchOutcome,
    generated: &DateTime<Local>,
) -> Result<()> {
    let report = JsonReport {
        timestamp: generated.to_rfc3339(),
        summary: Summary::from_outcome(outcome),
        interrupted: outcome.interrupted,
        results: &outcome.results,
    };

    let file = File::create(output_path)
        .with_context(|| format!("Failed to create report '{}'", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report)
        .context("Failed to write JSON report")?;
    writer.flush()?;
    Ok(())
}

/// Write both reports into `dir` using a timestamped file name
pub fn save_reports(dir: &Path, outcome: &BatchOutcome) -> Result<SavedReports> {
    let now = Local::now();
    let stem = report_stem(&now);
    let saved = SavedReports {
        text: dir.join(format!("{}.txt", stem)),
        json: dir.join(format!("{}.json", stem)),
    };

    write_text_report(&saved.text, outcome, &now)?;
    write_json_report(&saved.json, outcome, &now)?;
    log::info!(
        "Reports saved to {} and {}",
        saved.text.display(),
        saved.json.display()
    );
    Ok(saved)
}
