#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for python-venv
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone so they can travel inside events.

use std::borrow::Cow;

use thiserror::Error;

pub mod config;
pub mod env;
pub mod ops;
pub mod platform;
pub mod project;
pub mod requirements;
pub mod usage;

// Re-export all error types at the root
pub use config::ConfigError;
pub use env::EnvError;
pub use ops::OpsError;
pub use platform::PlatformError;
pub use project::ProjectError;
pub use requirements::RequirementsError;
pub use usage::UsageError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(#[from] UsageError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Env(#[from] EnvError),

    #[error("{0}")]
    Requirements(#[from] RequirementsError),

    #[error("{0}")]
    Project(#[from] ProjectError),

    #[error("{0}")]
    Platform(#[from] PlatformError),

    #[error("{0}")]
    Ops(#[from] OpsError),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("I/O error: {}: {message}", .path.display())]
    Io {
        message: String,
        path: std::path::PathBuf,
    },
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// An I/O failure on `path`
    pub fn io_with_path(err: &std::io::Error, path: impl Into<std::path::PathBuf>) -> Self {
        Self::Io {
            message: err.to_string(),
            path: path.into(),
        }
    }

    /// Whether this error came from bad command-line input.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Exit code of the external command whose failure produced this error.
    #[must_use]
    pub fn command_exit_code(&self) -> Option<i32> {
        match self {
            Self::Platform(PlatformError::CommandFailed { code, .. }) => Some(*code),
            _ => None,
        }
    }
}

/// Result type alias for python-venv operations
pub type Result<T> = std::result::Result<T, Error>;

/// What the CLI prints for an error: the message, a hint line and a code
/// for the debug log.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Usage(err) => err.user_message(),
            Error::Config(err) => err.user_message(),
            Error::Env(err) => err.user_message(),
            Error::Requirements(err) => err.user_message(),
            Error::Project(err) => err.user_message(),
            Error::Platform(err) => err.user_message(),
            Error::Ops(err) => err.user_message(),
            Error::Io { message, path } => Cow::Owned(format!("{}: {message}", path.display())),
            Error::Internal(_) => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Usage(err) => err.user_hint(),
            Error::Config(err) => err.user_hint(),
            Error::Env(err) => err.user_hint(),
            Error::Requirements(err) => err.user_hint(),
            Error::Project(err) => err.user_hint(),
            Error::Platform(err) => err.user_hint(),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Usage(err) => err.user_code(),
            Error::Config(err) => err.user_code(),
            Error::Env(err) => err.user_code(),
            Error::Requirements(err) => err.user_code(),
            Error::Project(err) => err.user_code(),
            Error::Platform(err) => err.user_code(),
            Error::Ops(err) => err.user_code(),
            Error::Internal(_) => Some("error.internal"),
            Error::Io { .. } => Some("error.io"),
        }
    }
}
