//! Error types for the GitHub filesystem.

use thiserror::Error;

/// Kind of node the remote side actually found when a fetch asked for the other one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Directory,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Directory => write!(f, "directory"),
        }
    }
}

/// Failures reported by a content API implementation.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// The coordinate exists but is not the kind of node that was requested.
    #[error("{path} is a {actual}")]
    TypeMismatch { path: String, actual: NodeKind },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Errors surfaced to filesystem callers.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Read-only filesystem")]
    ReadOnly,

    #[error("Remote error: {0}")]
    Remote(RemoteError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        FsError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<RemoteError> for FsError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::NotFound(what) => FsError::NotFound(what),
            // A mismatch that reaches a caller means neither shape matched.
            RemoteError::TypeMismatch { path, .. } => FsError::NotFound(path),
            other => FsError::Remote(other),
        }
    }
}

impl From<config::ConfigError> for FsError {
    fn from(err: config::ConfigError) -> Self {
        FsError::Config(err.to_string())
    }
}

impl From<FsError> for std::io::Error {
    fn from(err: FsError) -> Self {
        use std::io::ErrorKind;
        let kind = match &err {
            FsError::InvalidPath { .. } | FsError::InvalidArgument(_) => ErrorKind::InvalidInput,
            FsError::NotFound(_) => ErrorKind::NotFound,
            FsError::ReadOnly => ErrorKind::PermissionDenied,
            FsError::Io(e) => e.kind(),
            FsError::Remote(_) | FsError::Config(_) => ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}
