//! CLI error handling

use std::fmt;

use pyvenv_errors::UserFacingError;

/// Exit status for bad command-line input
pub const EXIT_USAGE: i32 = 2;

/// Exit status for failures that carry no status of their own
pub const EXIT_FAILURE: i32 = 1;

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Error from configuration loading or an operation
    Ops(pyvenv_errors::Error),
    /// Invalid command arguments
    InvalidArguments(String),
    /// I/O error
    Io(std::io::Error),
}

impl CliError {
    /// Process exit status for this error.
    ///
    /// A failing external command passes its own status through.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Ops(e) if e.is_usage() => EXIT_USAGE,
            CliError::Ops(e) => e.command_exit_code().unwrap_or(EXIT_FAILURE),
            CliError::InvalidArguments(_) => EXIT_USAGE,
            CliError::Io(_) => EXIT_FAILURE,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Ops(e) => {
                write!(f, "{}", e.user_message())?;
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            CliError::InvalidArguments(msg) => write!(f, "{msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Ops(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::InvalidArguments(_) => None,
        }
    }
}

impl From<pyvenv_errors::Error> for CliError {
    fn from(e: pyvenv_errors::Error) -> Self {
        CliError::Ops(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyvenv_errors::{PlatformError, RequirementsError, UsageError};

    #[test]
    fn usage_errors_exit_2() {
        let err = CliError::from(pyvenv_errors::Error::from(UsageError::MissingEnvName));
        assert_eq!(err.exit_code(), EXIT_USAGE);
        assert_eq!(
            CliError::InvalidArguments("bad".to_string()).exit_code(),
            EXIT_USAGE
        );
    }

    #[test]
    fn command_failure_passes_status_through() {
        let err = CliError::from(pyvenv_errors::Error::from(PlatformError::CommandFailed {
            command: "conda env list".to_string(),
            code: 42,
        }));
        assert_eq!(err.exit_code(), 42);
    }

    #[test]
    fn other_failures_exit_1() {
        let err = CliError::from(pyvenv_errors::Error::from(RequirementsError::MissingFiles {
            files: vec!["requirements.txt".to_string()],
        }));
        assert_eq!(err.exit_code(), EXIT_FAILURE);
        assert_eq!(err.to_string(), "Missing requirements file: requirements.txt");
    }

    #[test]
    fn hint_goes_on_its_own_line() {
        let err = CliError::from(pyvenv_errors::Error::from(UsageError::MissingPipArgs));
        let rendered = err.to_string();
        let mut lines = rendered.lines();
        assert_eq!(
            lines.next(),
            Some("the pip requirements scheme needs at least one argument to pass to pip")
        );
        assert!(lines.next().is_some_and(|line| line.starts_with("  Hint: ")));
    }
}
