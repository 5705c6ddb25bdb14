//! Command-line usage errors
//!
//! These are raised before any command is planned and map to the
//! conventional usage exit status.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum UsageError {
    #[error("the '{action}' action needs a requirements scheme (-r/--requirements or one of its shortcuts)")]
    MissingRequirementScheme { action: String },

    #[error("Please supply either the '-e/--env-name' or '-r/--requirements' option so we know the name of the environment to remove.")]
    MissingEnvName,

    #[error("'--python-version' is only supported for pyenv and conda environments, not {env_type}")]
    PythonVersionUnsupported { env_type: String },

    #[error("invalid Python version '{version}': must start with X, X.Y, or X.Y.Z")]
    InvalidPythonVersion { version: String },

    #[error("'-V/--venvs-dir' is only supported for named-venv environments, not {env_type}")]
    VenvsDirUnsupported { env_type: String },

    #[error("extra arguments are only accepted with the pip requirements scheme: {args}")]
    UnexpectedPipArgs { args: String },

    #[error("the pip requirements scheme needs at least one argument to pass to pip")]
    MissingPipArgs,

    #[error("invalid {what}: {value}")]
    InvalidValue { what: String, value: String },
}

impl UserFacingError for UsageError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnexpectedPipArgs { .. } | Self::MissingPipArgs => {
                Some("Put pip arguments after '--', e.g. '-P -- -r extra.txt'.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::MissingRequirementScheme { .. } => "usage.missing_requirement_scheme",
            Self::MissingEnvName => "usage.missing_env_name",
            Self::PythonVersionUnsupported { .. } => "usage.python_version_unsupported",
            Self::InvalidPythonVersion { .. } => "usage.invalid_python_version",
            Self::VenvsDirUnsupported { .. } => "usage.venvs_dir_unsupported",
            Self::UnexpectedPipArgs { .. } => "usage.unexpected_pip_args",
            Self::MissingPipArgs => "usage.missing_pip_args",
            Self::InvalidValue { .. } => "usage.invalid_value",
        };
        Some(code)
    }
}
