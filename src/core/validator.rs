//! Per-file validation logic

use serde::{Serialize, Serializer};
use std::any::Any;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;

/// Number of leading bytes read to confirm a file is readable
pub const PROBE_BYTES: u64 = 4096;

/// Maximum number of characters kept from an underlying error message
pub const DETAIL_LIMIT: usize = 50;

/// Why a file failed validation
///
/// Every variant is per-file and non-fatal: it is stored in the file's
/// [`ValidationResult`] and never propagated to the batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum CheckError {
    #[error("not found")]
    NotFound,
    #[error("empty file")]
    Empty,
    #[error("permission denied")]
    PermissionDenied,
    #[error("read failed: {0}")]
    ReadFailure(String),
    #[error("check error: {0}")]
    Unclassified(String),
}

impl CheckError {
    fn read_failure(err: &io::Error) -> Self {
        CheckError::ReadFailure(truncate_detail(&err.to_string()))
    }

    fn unclassified(detail: &str) -> Self {
        CheckError::Unclassified(truncate_detail(detail))
    }
}

/// Result of validating a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Path exactly as supplied by the caller
    pub path: String,
    pub filename: String,
    pub exists: bool,
    pub readable: bool,
    pub size: u64,
    #[serde(serialize_with = "serialize_reason")]
    pub error: Option<CheckError>,
}

impl ValidationResult {
    fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            filename: file_name_of(path),
            exists: false,
            readable: false,
            size: 0,
            error: None,
        }
    }

    /// Human-readable failure reason, `None` when the file is readable
    pub fn reason(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

fn serialize_reason<S: Serializer>(
    error: &Option<CheckError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Keep the first [`DETAIL_LIMIT`] characters of an error message.
///
/// Cuts on character boundaries; no ellipsis is appended.
pub fn truncate_detail(detail: &str) -> String {
    detail.chars().take(DETAIL_LIMIT).collect()
}

/// Basename of `path` for display, falling back to the path itself
pub fn file_name_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

/// Validate a single file
///
/// # Arguments
/// * `path` - Path to check, kept verbatim in the result
///
/// # Returns
/// A [`ValidationResult`]. This function never panics outward: any panic
/// raised while probing the file is turned into [`CheckError::Unclassified`].
pub fn validate_file(path: &str) -> ValidationResult {
    // Wrap in catch_unwind for panic isolation. The default panic hook still
    // prints the message to stderr first, which can break the progress line.
    match panic::catch_unwind(AssertUnwindSafe(|| check(path))) {
        Ok(result) => result,
        Err(payload) => panic_result(path, payload),
    }
}

/// Build the result for a check that panicked
fn panic_result(path: &str, payload: Box<dyn Any + Send>) -> ValidationResult {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic during check".to_string());
    log::debug!("Panic while checking {}: {}", path, detail);

    let mut result = ValidationResult::new(path);
    match fs::metadata(path) {
        Ok(metadata) => {
            result.exists = true;
            result.size = metadata.len();
            result.error = Some(CheckError::unclassified(&detail));
        }
        Err(_) => result.error = Some(CheckError::NotFound),
    }
    result
}

fn check(path: &str) -> ValidationResult {
    let mut result = ValidationResult::new(path);

    // 1. Existence and size. A path that cannot be stat'ed at all is
    // treated as absent, so `exists == false` always means "not found".
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            if e.kind() != ErrorKind::NotFound {
                log::debug!("Cannot stat {}: {}", path, e);
            }
            result.error = Some(CheckError::NotFound);
            return result;
        }
    };

    result.exists = true;
    result.size = metadata.len();

    // 2. Empty files are never readable
    if result.size == 0 {
        result.error = Some(CheckError::Empty);
        return result;
    }

    // 3. Probe the leading chunk
    match probe(Path::new(path), result.size) {
        Ok(()) => result.readable = true,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            result.error = Some(CheckError::PermissionDenied);
        }
        Err(e) => result.error = Some(CheckError::read_failure(&e)),
    }

    result
}

fn probe(path: &Path, size: u64) -> io::Result<()> {
    let file = File::open(path)?;
    let mut buffer = Vec::with_capacity(size.min(PROBE_BYTES) as usize);
    file.take(size.min(PROBE_BYTES)).read_to_end(&mut buffer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");
        let result = validate_file(path.to_str().unwrap());

        assert!(!result.exists);
        assert!(!result.readable);
        assert_eq!(result.size, 0);
        assert_eq!(result.error, Some(CheckError::NotFound));
        assert_eq!(result.reason().as_deref(), Some("not found"));
        assert_eq!(result.filename, "missing.txt");
    }

    #[test]
    fn test_empty_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let result = validate_file(temp_file.path().to_str().unwrap());

        assert!(result.exists);
        assert!(!result.readable);
        assert_eq!(result.size, 0);
        assert_eq!(result.error, Some(CheckError::Empty));
    }

    #[test]
    fn test_readable_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(&[b'x'; 10_000]).unwrap();
        temp_file.flush().unwrap();

        let result = validate_file(temp_file.path().to_str().unwrap());
        assert!(result.exists);
        assert!(result.readable);
        assert_eq!(result.size, 10_000);
        assert_eq!(result.error, None);
        assert_eq!(result.reason(), None);
    }

    #[test]
    fn test_unstatable_path_is_not_found() {
        let result = validate_file("bad\0name");
        assert!(!result.exists);
        assert_eq!(result.size, 0);
        assert_eq!(result.error, Some(CheckError::NotFound));
    }

    #[test]
    fn test_panic_with_str_payload_on_existing_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"twelve bytes").unwrap();
        temp_file.flush().unwrap();

        let result = panic_result(temp_file.path().to_str().unwrap(), Box::new("boom"));
        assert!(result.exists);
        assert!(!result.readable);
        assert_eq!(result.size, 12);
        assert_eq!(result.error, Some(CheckError::Unclassified("boom".into())));
        assert_eq!(result.reason().as_deref(), Some("check error: boom"));
    }

    #[test]
    fn test_panic_with_string_payload_is_truncated() {
        let temp_file = NamedTempFile::new().unwrap();
        let payload: Box<dyn Any + Send> = Box::new("z".repeat(120));

        let result = panic_result(temp_file.path().to_str().unwrap(), payload);
        assert!(result.exists);
        match result.error {
            Some(CheckError::Unclassified(detail)) => assert_eq!(detail, "z".repeat(DETAIL_LIMIT)),
            other => panic!("expected check error, got {:?}", other),
        }
    }

    #[test]
    fn test_panic_with_opaque_payload() {
        let temp_file = NamedTempFile::new().unwrap();
        let result = panic_result(temp_file.path().to_str().unwrap(), Box::new(42_u32));
        assert_eq!(
            result.error,
            Some(CheckError::Unclassified("panic during check".into()))
        );
    }

    #[test]
    fn test_panic_on_missing_path_is_not_found() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone.txt");

        for payload in [
            Box::new("boom") as Box<dyn Any + Send>,
            Box::new(String::from("boom")),
            Box::new(7_i64),
        ] {
            let result = panic_result(missing.to_str().unwrap(), payload);
            assert!(!result.exists);
            assert_eq!(result.size, 0);
            assert_eq!(result.error, Some(CheckError::NotFound));
        }
    }

    #[test]
    fn test_path_kept_verbatim() {
        let dir = TempDir::new().unwrap();
        let raw = format!("{}/./nested/../missing.bin", dir.path().display());
        let result = validate_file(&raw);
        assert_eq!(result.path, raw);
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"same bytes every time").unwrap();
        temp_file.flush().unwrap();

        let path = temp_file.path().to_str().unwrap();
        assert_eq!(validate_file(path), validate_file(path));
    }

    #[test]
    fn test_truncate_detail_counts_chars() {
        let long = "é".repeat(80);
        let truncated = truncate_detail(&long);
        assert_eq!(truncated.chars().count(), DETAIL_LIMIT);

        assert_eq!(truncate_detail("short"), "short");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(CheckError::NotFound.to_string(), "not found");
        assert_eq!(CheckError::Empty.to_string(), "empty file");
        assert_eq!(CheckError::PermissionDenied.to_string(), "permission denied");
        assert_eq!(
            CheckError::ReadFailure("Is a directory".into()).to_string(),
            "read failed: Is a directory"
        );
        assert_eq!(
            CheckError::Unclassified("boom".into()).to_string(),
            "check error: boom"
        );
    }

    #[test]
    fn test_file_name_of() {
        assert_eq!(file_name_of("/a/b/report.pdf"), "report.pdf");
        assert_eq!(file_name_of("plain.txt"), "plain.txt");
        assert_eq!(file_name_of("/"), "/");
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_is_read_failure() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("child"), b"x").unwrap();

        let result = validate_file(dir.path().to_str().unwrap());
        assert!(result.exists);
        assert!(!result.readable);
        // Some filesystems report directories as zero bytes
        if result.size == 0 {
            assert_eq!(result.error, Some(CheckError::Empty));
        } else {
            match result.error {
                Some(CheckError::ReadFailure(detail)) => {
                    assert!(detail.chars().count() <= DETAIL_LIMIT)
                }
                other => panic!("expected read failure, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_serialized_reason() {
        let dir = TempDir::new().unwrap();
        let result = validate_file(dir.path().join("gone").to_str().unwrap());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["error"], "not found");
        assert_eq!(json["exists"], false);
    }
}
