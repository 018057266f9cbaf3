//! Error types for file codecs and margin bells

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or writing BRF/BZY documents
///
/// A failed read never touches the document that is currently loaded.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The file to open does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Read or write failure on the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A BZY configuration header line could not be parsed
    #[error("malformed header on line {line}: {content:?}")]
    MalformedHeader { line: usize, content: String },

    /// A character cannot be represented as a single byte on disk
    #[error("character {ch:?} on line {line} cannot be written")]
    Unencodable { line: usize, ch: char },

    /// Save requested for a document that was never given a file name
    #[error("document has no file path")]
    NoFilePath,
}

impl CodecError {
    /// Map an `io::Error` raised while opening `path` to the closest variant
    pub fn from_open(err: std::io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound(path.to_path_buf()),
            _ => Self::Io(err),
        }
    }
}

/// Errors raised while loading a margin bell sound
#[derive(Debug, Error)]
pub enum BellError {
    #[error("sound file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unable to read sound file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported sound format: {0}")]
    UnsupportedFormat(String),

    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),
}
