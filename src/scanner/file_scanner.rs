//! Directory scanning

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Settings;

/// Collect the files under a directory that pass the extension filter
///
/// # Arguments
/// * `dir` - Directory to scan
/// * `settings` - Supplies the recursion flag and extension filter
///
/// # Returns
/// Vector of file paths as strings, in directory traversal order.
/// Entries that cannot be read are logged and skipped.
pub fn scan_directory(dir: &Path, settings: &Settings) -> Result<Vec<String>> {
    if !dir.is_dir() {
        bail!("Directory '{}' does not exist", dir.display());
    }

    let mut files = Vec::new();

    if settings.recursive {
        for entry in WalkDir::new(dir).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() {
                push_if_accepted(&mut files, entry.path(), settings);
            }
        }
    } else {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory '{}'", dir.display()))?;
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            // Follows symlinks, so a link to a file counts as a file
            if path.is_file() {
                push_if_accepted(&mut files, &path, settings);
            }
        }
    }

    log::info!("Found {} file(s) in {}", files.len(), dir.display());
    Ok(files)
}

/// Scan several directories and concatenate the results.
///
/// A directory that cannot be scanned is logged and skipped so one bad
/// entry does not lose the rest.
pub fn scan_directories(dirs: &[PathBuf], settings: &Settings) -> Vec<String> {
    let mut files = Vec::new();
    for dir in dirs {
        match scan_directory(dir, settings) {
            Ok(found) => files.extend(found),
            Err(e) => log::warn!("{:#}", e),
        }
    }
    files
}

fn push_if_accepted(files: &mut Vec<String>, path: &Path, settings: &Settings) {
    let extension = path.extension().map(|ext| ext.to_string_lossy());
    if settings.accepts_extension(extension.as_deref()) {
        files.push(path.to_string_lossy().into_owned());
    }
}
