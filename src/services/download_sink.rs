use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::CardError;

/// Receives a finished card for the user to keep
pub trait DownloadSink: Send + Sync {
    fn deliver(&self, filename: &str, png_bytes: &[u8]) -> Result<(), CardError>;
}

/// Writes cards into a directory
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a card with this filename is written to
    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(safe_filename(filename))
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, filename: &str, png_bytes: &[u8]) -> Result<(), CardError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(filename);
        std::fs::write(&path, png_bytes)?;
        tracing::info!(path = %path.display(), size_bytes = png_bytes.len(), "Card saved");
        Ok(())
    }
}

/// Keeps delivered cards in memory
#[derive(Default)]
pub struct MemorySink {
    deliveries: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything delivered so far
    pub fn take(&self) -> Vec<(String, Vec<u8>)> {
        self.deliveries
            .lock()
            .map(|mut d| std::mem::take(&mut *d))
            .unwrap_or_default()
    }
}

impl DownloadSink for MemorySink {
    fn deliver(&self, filename: &str, png_bytes: &[u8]) -> Result<(), CardError> {
        self.deliveries
            .lock()
            .map_err(|_| CardError::Delivery(std::io::Error::other("memory sink poisoned")))?
            .push((filename.to_string(), png_bytes.to_vec()));
        Ok(())
    }
}

/// Keep a suggested filename inside its target directory
pub fn safe_filename(filename: &str) -> String {
    let name: String = filename
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '-',
            c => c,
        })
        .collect();
    match name.as_str() {
        "" | "." | ".." => "story.png".to_string(),
        _ => name,
    }
}
