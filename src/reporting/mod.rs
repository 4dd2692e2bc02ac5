//! Console summaries and exported reports

pub mod report_writer;
pub mod summary;

pub use report_writer::{save_reports, write_json_report, write_text_report, SavedReports};
pub use summary::{group_by_reason, write_summary, Summary};
