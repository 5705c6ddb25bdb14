//! Requirement scheme errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum RequirementsError {
    /// One or more requirement files named by the scheme are absent.
    #[error("Missing requirements {}: {}", noun(.files.len()), .files.join(", "))]
    MissingFiles { files: Vec<String> },
}

fn noun(count: usize) -> &'static str {
    if count == 1 {
        "file"
    } else {
        "files"
    }
}

impl UserFacingError for RequirementsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::MissingFiles { .. } => Some("requirements.missing_files"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_uses_singular_for_one_file() {
        let err = RequirementsError::MissingFiles {
            files: vec!["requirements.txt".to_string()],
        };
        assert_eq!(err.to_string(), "Missing requirements file: requirements.txt");
    }

    #[test]
    fn message_lists_all_missing_files() {
        let err = RequirementsError::MissingFiles {
            files: vec![
                "dev/requirements_build.txt".to_string(),
                "dev/requirements_test.txt".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Missing requirements files: dev/requirements_build.txt, dev/requirements_test.txt"
        );
    }
}
