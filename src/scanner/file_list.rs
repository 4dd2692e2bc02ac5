//! Loading path lists from text files

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Paths read from a list file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileList {
    /// Entries that exist on disk, in file order
    pub paths: Vec<String>,
    /// `(line number, path)` for entries that were skipped as missing
    pub missing: Vec<(usize, String)>,
}

/// Read one path per line from `list_path`.
///
/// Blank lines and lines starting with `#` are ignored, surrounding
/// whitespace is trimmed, and invalid UTF-8 is replaced rather than
/// rejected. Entries that do not exist are reported in
/// [`FileList::missing`] instead of being queued.
pub fn load_file_list(list_path: &Path) -> Result<FileList> {
    let bytes = fs::read(list_path)
        .with_context(|| format!("Failed to read file list '{}'", list_path.display()))?;
    let text = String::from_utf8_lossy(&bytes);

    let mut list = FileList::default();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if Path::new(line).exists() {
            list.paths.push(line.to_string());
        } else {
            log::warn!("Line {}: file does not exist: {}", index + 1, line);
            list.missing.push((index + 1, line.to_string()));
        }
    }

    log::info!(
        "Loaded {} path(s) from '{}'",
        list.paths.len(),
        list_path.display()
    );
    Ok(list)
}
