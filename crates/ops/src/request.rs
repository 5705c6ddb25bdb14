//! What the user asked for, before anything is resolved

use pyvenv_errors::UsageError;
use pyvenv_types::{Action, EnvType, NamingScheme, ReqScheme};
use std::path::PathBuf;

/// Options of one create/remove/replace invocation.
///
/// Only values given explicitly on the command line live here; defaults
/// from the configuration are applied while planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvRequest {
    pub env_type: EnvType,
    pub scheme: Option<ReqScheme>,
    pub basename: Option<String>,
    pub env_name: Option<String>,
    pub venvs_dir: Option<PathBuf>,
    pub python: Option<String>,
    pub python_version: Option<String>,
    pub force: bool,
    pub pip_args: Vec<String>,
}

impl EnvRequest {
    #[must_use]
    pub fn new(env_type: EnvType, scheme: Option<ReqScheme>) -> Self {
        Self {
            env_type,
            scheme,
            basename: None,
            env_name: None,
            venvs_dir: None,
            python: None,
            python_version: None,
            force: false,
            pip_args: Vec::new(),
        }
    }

    /// Reject option combinations that make no sense for `action`.
    ///
    /// # Errors
    ///
    /// Returns the first [`UsageError`] found.
    pub fn validate(&self, action: Action) -> Result<(), UsageError> {
        if action.creates() && self.scheme.is_none() {
            return Err(UsageError::MissingRequirementScheme {
                action: action.to_string(),
            });
        }

        if action == Action::Remove
            && self.env_type.naming_scheme() == NamingScheme::Named
            && self.env_name.is_none()
            && self.scheme.is_none()
        {
            return Err(UsageError::MissingEnvName);
        }

        if let Some(version) = &self.python_version {
            pyvenv_env::check_python_version(self.env_type, version)?;
        }

        if self.venvs_dir.is_some() && self.env_type != EnvType::NamedVenv {
            return Err(UsageError::VenvsDirUnsupported {
                env_type: self.env_type.to_string(),
            });
        }

        if self.scheme == Some(ReqScheme::Pip) {
            if action.creates() && self.pip_args.is_empty() {
                return Err(UsageError::MissingPipArgs);
            }
        } else if !self.pip_args.is_empty() {
            return Err(UsageError::UnexpectedPipArgs {
                args: self.pip_args.join(" "),
            });
        }

        Ok(())
    }
}
