//! Project metadata errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ProjectError {
    /// Neither `pyproject.toml` nor `setup.py` could tell us anything.
    #[error("no Python project found in {dir} (looked for pyproject.toml and setup.py)")]
    NoProject { dir: String },

    #[error("unable to read {path}: {message}")]
    InvalidMetadata { path: String, message: String },

    #[error("project metadata in {dir} does not declare a {field}")]
    MissingField { dir: String, field: String },

    #[error("'{command}' failed: {message}")]
    QueryFailed { command: String, message: String },
}

impl UserFacingError for ProjectError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NoProject { .. } | Self::MissingField { .. } => {
                Some("Pass '-b/--basename' or '-e/--env-name' to name the environment explicitly.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NoProject { .. } => "project.not_found",
            Self::InvalidMetadata { .. } => "project.invalid_metadata",
            Self::MissingField { .. } => "project.missing_field",
            Self::QueryFailed { .. } => "project.query_failed",
        };
        Some(code)
    }
}
