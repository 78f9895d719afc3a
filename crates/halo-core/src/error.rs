use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by halo.
///
/// Only lifecycle operations return these: starting the monitor, loading
/// configuration, setting up logging, and creating platform resources.
/// Per-window query failures never become an `Error`; they fall back to
/// sentinel values at the point of the read.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("failed to subscribe to window events: {0}")]
    Subscribe(String),

    #[error("{context}: {message}")]
    Platform {
        context: &'static str,
        message: String,
    },

    #[error("another instance is already running")]
    AlreadyRunning,

    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl Error {
    /// Wraps a platform API failure with a short description of the call.
    pub fn platform(context: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Platform {
            context,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
