//! Virtual environment state errors

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum EnvError {
    /// An environment was expected not to exist, but does.
    #[error("Found preexisting {name}, please remove it first, or use '--force'")]
    Exists { name: String },

    /// Something other than a directory sits where the environment should be.
    #[error("{path} exists, but is not a directory; you must deal with it by hand.")]
    Occluded { path: String },
}

impl UserFacingError for EnvError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Exists { .. } => Some("Use the 'replace' action to recreate the environment."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::Exists { .. } => "env.exists",
            Self::Occluded { .. } => "env.occluded",
        };
        Some(code)
    }
}
