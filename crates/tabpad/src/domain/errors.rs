//! Domain-specific errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::model::DocumentId;

/// Failures reading or writing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },
    #[error("permission denied: {}", path.display())]
    PermissionDenied { path: PathBuf },
    #[error("{} is not valid UTF-8 text", path.display())]
    InvalidEncoding { path: PathBuf },
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no open document with id {0}")]
    UnknownDocument(DocumentId),
}

impl DocumentError {
    /// Classify an IO error raised while touching `path`.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::InvalidData => Self::InvalidEncoding { path },
            _ => Self::Io { path, source },
        }
    }
}

/// The user dismissed a dialog or prompt without choosing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cancelled by user")]
pub struct Cancelled;
