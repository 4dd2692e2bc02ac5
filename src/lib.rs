//! File Validator Library
//!
//! Checks in parallel that files exist, are non-empty and readable.

pub mod config;
pub mod core;
pub mod interactive;
pub mod logging;
pub mod reporting;
pub mod scanner;

pub use crate::core::validator;
pub use crate::reporting::report_writer;
pub use crate::scanner::file_scanner;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::core::{
        run_batch, validate_file, BatchOutcome, CheckError, ProgressReporter, ValidationResult,
        WorkerPool,
    };
    pub use crate::reporting::{save_reports, write_summary, Summary};
    pub use crate::scanner::{load_file_list, scan_directories, scan_directory, FileList};
}
