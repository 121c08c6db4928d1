use mediation_core::DecodeError;
use mediation_fill::ContentError;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of a session or watcher operation.
#[derive(Debug, Error)]
pub enum LiveError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot watch {}: expected a file path", .path.display())]
    InvalidWatchPath { path: PathBuf },

    #[error("page does not decode: {0}")]
    Decode(#[from] DecodeError),

    #[error("file watcher: {0}")]
    Watch(#[from] notify::Error),

    #[error("content: {0}")]
    Content(#[from] ContentError),
}
