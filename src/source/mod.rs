//! Content sources: where the graph builder reads file text from.

pub mod cached;
pub mod fs;
pub mod git;

pub use cached::CachedSource;
pub use fs::FsSource;
pub use git::GitSource;

use thiserror::Error;

/// Why a single file's content could not be read. Never fatal to a build.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("not a text file: {0}")]
    Binary(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git error reading {path}: {source}")]
    Git {
        path: String,
        #[source]
        source: git2::Error,
    },
}

/// Capability to read a repository file's text by its root-relative path.
pub trait ContentSource: Sync {
    fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

impl<F> ContentSource for F
where
    F: Fn(&str) -> Result<String, FetchError> + Sync,
{
    fn fetch(&self, path: &str) -> Result<String, FetchError> {
        self(path)
    }
}

/// Decode bytes as text. Content with a NUL byte is binary; invalid UTF-8
/// sequences (Latin-1 sources, stray bytes) become U+FFFD.
pub fn decode_text(path: &str, bytes: Vec<u8>) -> Result<String, FetchError> {
    if bytes.contains(&0) {
        return Err(FetchError::Binary(path.to_string()));
    }
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
