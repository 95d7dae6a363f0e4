use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// A recipe URL that could not be processed, with why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUrl {
    pub url: String,
    pub kind: String,
    pub message: String,
}

impl FailedUrl {
    pub fn new(url: impl Into<String>, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// `<url> --> <kind>: <message>`
    pub fn log_line(&self) -> String {
        format!("{} --> {}: {}", self.url, self.kind, self.message)
    }
}

/// Append-only failure log
///
/// Write-only audit trail; retries never read from it.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line for `failure`
    pub fn append(&self, failure: &FailedUrl) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", failure.log_line())
    }
}
