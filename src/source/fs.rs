use crate::source::{decode_text, ContentSource, FetchError};
use std::path::{Path, PathBuf};

/// Reads files from a working tree on disk.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentSource for FsSource {
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let full = self.root.join(path);
        match std::fs::read(&full) {
            Ok(bytes) => decode_text(path, bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.to_string()))
            }
            Err(e) => Err(FetchError::Io {
                path: path.to_string(),
                source: e,
            }),
        }
    }
}
