//! Console summary of a finished batch

use serde::Serialize;
use std::io::{self, Write};

use crate::core::{BatchOutcome, ValidationResult};

/// Problem files listed per reason before the rest are elided
pub const MAX_LISTED_PER_REASON: usize = 10;

/// Headline counts for a batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total_files: usize,
    pub good_files: usize,
    pub bad_files: usize,
    pub total_time: f64,
}

impl Summary {
    pub fn from_outcome(outcome: &BatchOutcome) -> Self {
        let good = outcome.good_count();
        Self {
            total_files: outcome.results.len(),
            good_files: good,
            bad_files: outcome.results.len() - good,
            total_time: outcome.elapsed_secs(),
        }
    }

    fn percent(&self, count: usize) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            count as f64 / self.total_files as f64 * 100.0
        }
    }

    /// Files per second, 0 when no time was measured
    pub fn throughput(&self) -> f64 {
        if self.total_time > 0.0 {
            self.total_files as f64 / self.total_time
        } else {
            0.0
        }
    }
}

/// Group unreadable results by failure reason, in order of first appearance
pub fn group_by_reason(results: &[ValidationResult]) -> Vec<(String, Vec<&ValidationResult>)> {
    let mut groups: Vec<(String, Vec<&ValidationResult>)> = Vec::new();
    for result in results.iter().filter(|r| !r.readable) {
        let Some(reason) = result.reason() else {
            continue;
        };
        match groups.iter_mut().find(|(r, _)| *r == reason) {
            Some((_, members)) => members.push(result),
            None => groups.push((reason, vec![result])),
        }
    }
    groups
}

/// Write the human-readable summary of `outcome` to `out`
pub fn write_summary<W: Write>(out: &mut W, outcome: &BatchOutcome) -> io::Result<()> {
    if outcome.results.is_empty() && !outcome.interrupted {
        return Ok(());
    }

    let summary = Summary::from_outcome(outcome);
    let rule = "=".repeat(60);

    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "CHECK SUMMARY")?;
    writeln!(out, "{}", rule)?;
    if outcome.interrupted {
        writeln!(
            out,
            "Interrupted: {} of {} file(s) were checked",
            outcome.results.len(),
            outcome.total
        )?;
    }
    writeln!(out, "  Total files:   {}", summary.total_files)?;
    writeln!(
        out,
        "  Good files:    {} ({:.1}%)",
        summary.good_files,
        summary.percent(summary.good_files)
    )?;
    writeln!(
        out,
        "  Problem files: {} ({:.1}%)",
        summary.bad_files,
        summary.percent(summary.bad_files)
    )?;
    writeln!(out, "  Elapsed:       {:.1} s", summary.total_time)?;
    writeln!(out, "  Throughput:    {:.1} files/s", summary.throughput())?;
    writeln!(out)?;

    if summary.bad_files > 0 {
        writeln!(out, "Problem files:")?;
        writeln!(out, "{}", "-".repeat(60))?;
        for (reason, files) in group_by_reason(&outcome.results) {
            writeln!(out)?;
            writeln!(out, "{} ({}):", reason, files.len())?;
            for result in files.iter().take(MAX_LISTED_PER_REASON) {
                writeln!(out, "  • {} ({} bytes)", result.filename, result.size)?;
            }
            if files.len() > MAX_LISTED_PER_REASON {
                writeln!(
                    out,
                    "  ... and {} more",
                    files.len() - MAX_LISTED_PER_REASON
                )?;
            }
        }
        writeln!(out)?;
        writeln!(out, "{} file(s) need attention", summary.bad_files)?;
    } else if summary.total_files > 0 {
        writeln!(out, "All files are OK!")?;
    }

    writeln!(out, "{}", rule)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validate_file;
    use std::time::Duration;
    use tempfile::TempDir;

    fn outcome_of(results: Vec<ValidationResult>) -> BatchOutcome {
        BatchOutcome {
            total: results.len(),
            results,
            elapsed: Duration::from_millis(500),
            interrupted: false,
        }
    }

    #[test]
    fn test_summary_counts() {
        let dir = TempDir::new().unwrap();
        let ok = dir.path().join("ok.txt");
        std::fs::write(&ok, b"hello").unwrap();

        let outcome = outcome_of(vec![
            validate_file(ok.to_str().unwrap()),
            validate_file(dir.path().join("gone").to_str().unwrap()),
        ]);
        let summary = Summary::from_outcome(&outcome);
        assert_eq!(summary.total_files, 2);
        assert_eq!(summary.good_files, 1);
        assert_eq!(summary.bad_files, 1);
        assert!((summary.throughput() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.bin");
        std::fs::write(&empty, b"").unwrap();

        let results = vec![
            validate_file(dir.path().join("a").to_str().unwrap()),
            validate_file(empty.to_str().unwrap()),
            validate_file(dir.path().join("b").to_str().unwrap()),
        ];
        let groups = group_by_reason(&results);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "not found");
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, "empty file");
    }

    #[test]
    fn test_long_groups_are_elided() {
        let dir = TempDir::new().unwrap();
        let results = (0..13)
            .map(|i| validate_file(dir.path().join(format!("m{}", i)).to_str().unwrap()))
            .collect();

        let mut out = Vec::new();
        write_summary(&mut out, &outcome_of(results)).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("not found (13):"));
        assert_eq!(text.matches("  • ").count(), MAX_LISTED_PER_REASON);
        assert!(text.contains("... and 3 more"));
        assert!(text.contains("13 file(s) need attention"));
    }

    #[test]
    fn test_all_good_message() {
        let dir = TempDir::new().unwrap();
        let ok = dir.path().join("ok.txt");
        std::fs::write(&ok, b"hello").unwrap();

        let mut out = Vec::new();
        write_summary(&mut out, &outcome_of(vec![validate_file(ok.to_str().unwrap())])).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("All files are OK!"));
    }

    #[test]
    fn test_empty_outcome_prints_nothing() {
        let mut out = Vec::new();
        write_summary(&mut out, &BatchOutcome::empty()).unwrap();
        assert!(out.is_empty());
    }
}
