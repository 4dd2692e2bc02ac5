//! Live progress display for a running batch

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::validator::ValidationResult;

/// Width of the rendered bar, in cells
pub const BAR_WIDTH: usize = 30;

/// Longest filename shown next to the bar
pub const NAME_WIDTH: usize = 30;

/// Receives progress updates from the worker pool.
///
/// Purely observational: nothing a reporter does can change the outcome of
/// a batch.
pub trait ProgressReporter: Send + Sync {
    /// Called once before any worker starts
    fn on_start(&self, _total: usize) {}

    /// Called after each result is recorded
    ///
    /// # Arguments
    /// * `processed` - Processed count returned by the aggregator
    /// * `total` - Size of the batch
    /// * `result` - The result that was just recorded
    fn on_result(&self, processed: usize, total: usize, result: &ValidationResult);

    /// Called once after every worker has stopped
    fn on_finish(&self) {}
}

/// Reporter that draws nothing, used in batch mode and tests
pub struct NoOpReporter;

impl ProgressReporter for NoOpReporter {
    fn on_result(&self, _processed: usize, _total: usize, _result: &ValidationResult) {}
}

/// Terminal progress bar built on indicatif
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());
        let template = format!(
            "[{{bar:{}}}] {{pos}}/{{len}} {{msg}}",
            BAR_WIDTH
        );
        bar.set_style(
            ProgressStyle::default_bar()
                .template(&template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█░"),
        );
        Self { bar }
    }
}

impl Default for BarReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for BarReporter {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn on_result(&self, _processed: usize, total: usize, result: &ValidationResult) {
        // inc() rather than set_position(): updates from different workers may
        // arrive out of order
        self.bar.inc(1);
        let done = self.bar.position() as usize;
        self.bar.set_message(format!(
            "({}) {}",
            percent_label(done, total),
            status_message(result)
        ));
    }

    fn on_finish(&self) {
        self.bar.finish();
    }
}

/// Pass/fail glyph for one result
pub fn status_glyph(result: &ValidationResult) -> char {
    if result.readable {
        '✓'
    } else {
        '✗'
    }
}

/// Share of the batch done, with one decimal
pub fn percent_label(processed: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".to_string();
    }
    format!("{:.1}%", processed as f64 / total as f64 * 100.0)
}

/// Glyph plus filename truncated to [`NAME_WIDTH`] characters
pub fn status_message(result: &ValidationResult) -> String {
    let name: String = result.filename.chars().take(NAME_WIDTH).collect();
    format!("{} {}", status_glyph(result), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validator::validate_file;

    fn result_named(name: &str) -> ValidationResult {
        validate_file(&format!("/nonexistent/{}", name))
    }

    #[test]
    fn test_glyphs() {
        let dir = tempfile::TempDir::new().unwrap();
        let ok = dir.path().join("ok.txt");
        std::fs::write(&ok, b"data").unwrap();

        assert_eq!(status_glyph(&validate_file(ok.to_str().unwrap())), '✓');
        assert_eq!(status_glyph(&result_named("gone")), '✗');
        assert_eq!(status_message(&result_named("gone")), "✗ gone");
    }

    #[test]
    fn test_percent_has_one_decimal() {
        assert_eq!(percent_label(1, 3), "33.3%");
        assert_eq!(percent_label(2, 3), "66.7%");
        assert_eq!(percent_label(7, 7), "100.0%");
        assert_eq!(percent_label(0, 0), "0.0%");
    }

    #[test]
    fn test_long_names_are_truncated() {
        let long = "x".repeat(45);
        let message = status_message(&result_named(&long));
        assert_eq!(message, format!("✗ {}", "x".repeat(NAME_WIDTH)));
    }
}
