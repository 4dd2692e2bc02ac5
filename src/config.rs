//! User-adjustable settings for a validation run

use std::fmt;

/// Worker threads used when nothing else is configured
pub const DEFAULT_THREADS: usize = 4;

/// Largest accepted worker count
pub const MAX_THREADS: usize = 16;

/// Settings shared by every run started from the menu or the command line.
///
/// Passed by reference into the scanner and the worker pool; nothing reads
/// settings from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub threads: usize,
    /// Lowercase extensions including the leading dot, `None` for all files
    pub extensions: Option<Vec<String>>,
    pub recursive: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            extensions: None,
            recursive: true,
        }
    }
}

impl Settings {
    /// Set the worker count, falling back to [`DEFAULT_THREADS`] when out of range
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = validated_threads(threads).unwrap_or(DEFAULT_THREADS);
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = normalize_extensions(extensions);
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Whether `extension` (with or without the dot) passes the filter
    pub fn accepts_extension(&self, extension: Option<&str>) -> bool {
        match &self.extensions {
            None => true,
            Some(allowed) => match extension {
                Some(ext) => {
                    let ext = format!(".{}", ext.trim_start_matches('.').to_lowercase());
                    allowed.iter().any(|a| *a == ext)
                }
                None => false,
            },
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let extensions = match &self.extensions {
            Some(list) => list.join(" "),
            None => "all".to_string(),
        };
        write!(
            f,
            "threads={}, recursive={}, extensions={}",
            self.threads, self.recursive, extensions
        )
    }
}

/// `Some(threads)` when it lies in `1..=MAX_THREADS`
pub fn validated_threads(threads: usize) -> Option<usize> {
    (1..=MAX_THREADS).contains(&threads).then_some(threads)
}

/// Lowercase each extension and make sure it starts with a dot.
///
/// Returns `None` when no non-blank extension is given, meaning "all files".
pub fn normalize_extensions<I, S>(extensions: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut list: Vec<String> = Vec::new();
    for ext in extensions {
        let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
        if ext.is_empty() {
            continue;
        }
        let ext = format!(".{}", ext);
        if !list.contains(&ext) {
            list.push(ext);
        }
    }
    (!list.is_empty()).then_some(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.threads, 4);
        assert_eq!(settings.extensions, None);
        assert!(settings.recursive);
    }

    #[test]
    fn test_threads_out_of_range_fall_back() {
        assert_eq!(Settings::default().with_threads(0).threads, DEFAULT_THREADS);
        assert_eq!(Settings::default().with_threads(17).threads, DEFAULT_THREADS);
        assert_eq!(Settings::default().with_threads(1).threads, 1);
        assert_eq!(Settings::default().with_threads(16).threads, 16);
    }

    #[test]
    fn test_normalize_extensions() {
        assert_eq!(
            normalize_extensions([".PDF", "docx", " .txt ", "pdf"]),
            Some(vec![".pdf".to_string(), ".docx".to_string(), ".txt".to_string()])
        );
        assert_eq!(normalize_extensions(["", "  "]), None);
        assert_eq!(normalize_extensions(Vec::<String>::new()), None);
    }

    #[test]
    fn test_accepts_extension() {
        let settings = Settings::default().with_extensions([".pdf"]);
        assert!(settings.accepts_extension(Some("PDF")));
        assert!(settings.accepts_extension(Some(".pdf")));
        assert!(!settings.accepts_extension(Some("txt")));
        assert!(!settings.accepts_extension(None));

        assert!(Settings::default().accepts_extension(None));
    }

    #[test]
    fn test_display() {
        let settings = Settings::default().with_extensions(["pdf", "doc"]);
        assert_eq!(
            settings.to_string(),
            "threads=4, recursive=true, extensions=.pdf .doc"
        );
    }
}
