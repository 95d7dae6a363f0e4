use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Single-integer checkpoint file
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    path: PathBuf,
}

impl ProgressTracker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last fully processed page; 0 when the file is missing, empty or corrupt
    pub fn read_checkpoint(&self) -> u32 {
        match fs::read_to_string(&self.path) {
            Ok(content) => content.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    "Ignoring unreadable checkpoint in {}: {:?}",
                    self.path.display(),
                    content.trim()
                );
                0
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                tracing::warn!("Failed to read checkpoint {}: {}", self.path.display(), e);
                0
            }
        }
    }

    /// Overwrites the checkpoint with `page`
    ///
    /// Writes a sibling temp file and renames it over the checkpoint so a
    /// crash mid-write leaves the previous value intact.
    pub fn save_checkpoint(&self, page: u32) -> io::Result<()> {
        let tmp = self.temp_path();
        fs::write(&tmp, page.to_string())?;
        fs::rename(&tmp, &self.path)
    }

    /// `<path>.tmp`, next to the checkpoint
    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Starts over from the first page
    pub fn reset(&self) -> io::Result<()> {
        self.save_checkpoint(0)
    }
}
