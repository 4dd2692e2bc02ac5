//! Path-list producers: directory scanning and list files

pub mod file_list;
pub mod file_scanner;

pub use file_list::{load_file_list, FileList};
pub use file_scanner::{scan_directories, scan_directory};
