use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while building or installing a logger.
///
/// Logging itself never fails from the caller's point of view; these only
/// come out of construction, where the program can still react.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("can't open error log {path:?}: {source}")]
    OpenErrorLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't open info log {path:?}: {source}")]
    OpenInfoLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid timestamp format {format:?}")]
    TimestampFormat { format: String },

    #[error("a global `log` logger is already installed")]
    LoggerAlreadySet(#[from] log::SetLoggerError),

    #[error("a global tracing subscriber is already installed: {0}")]
    SubscriberAlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),
}

pub type Result<T> = std::result::Result<T, LoggerError>;
