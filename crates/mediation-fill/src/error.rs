use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure while importing, exporting or materialising content.
///
/// Every operation returning this error leaves the store as it was.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("malformed content JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("content JSON must be an object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid base64 image payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("image `{path}` has no embedded payload and its source file is gone")]
    NoSource { path: String },
}

impl ContentError {
    /// Adapter for `map_err` on filesystem calls.
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
