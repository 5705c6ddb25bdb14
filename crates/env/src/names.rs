//! Environment naming

use pyvenv_config::constants::{DEV_SUFFIX, VENV_DIR};
use pyvenv_errors::UsageError;
use pyvenv_types::{EnvType, NamingScheme, ReqScheme};

/// Name an environment gets when none is given explicitly.
///
/// Anonymous environments always live in `.venv`. Named environments are
/// called after the project basename, with `-dev` appended for development
/// schemes; `None` means the basename is still unknown.
#[must_use]
pub fn default_env_name(
    env_type: EnvType,
    scheme: Option<ReqScheme>,
    basename: Option<&str>,
) -> Option<String> {
    match env_type.naming_scheme() {
        NamingScheme::Anonymous => Some(VENV_DIR.to_string()),
        NamingScheme::Named => basename.map(|basename| {
            if scheme.is_some_and(ReqScheme::is_dev) {
                format!("{basename}{DEV_SUFFIX}")
            } else {
                basename.to_string()
            }
        }),
    }
}

/// Check that `--python-version` makes sense for `env_type`.
///
/// conda takes the version as a match spec (`python=3.11`), so it has to
/// start with a version number; pyenv accepts anything it can resolve.
///
/// # Errors
///
/// Returns a usage error for backends without version selection, or for a
/// conda version that does not start with `X`, `X.Y` or `X.Y.Z`.
pub fn check_python_version(env_type: EnvType, version: &str) -> Result<(), UsageError> {
    if !env_type.accepts_python_version() {
        return Err(UsageError::PythonVersionUnsupported {
            env_type: env_type.to_string(),
        });
    }
    if env_type == EnvType::Conda && !version.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(UsageError::InvalidPythonVersion {
            version: version.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn anonymous_env_ignores_basename() {
        assert_eq!(
            default_env_name(EnvType::Venv, Some(ReqScheme::Dev), Some("proj")),
            Some(".venv".to_string())
        );
    }

    #[test]
    fn named_env_without_basename_is_unresolved() {
        assert_eq!(default_env_name(EnvType::Conda, Some(ReqScheme::Plain), None), None);
    }

    #[test]
    fn python_version_rules() {
        assert!(check_python_version(EnvType::Pyenv, "miniconda3-latest").is_ok());
        assert!(check_python_version(EnvType::Conda, "3.12").is_ok());
        assert!(check_python_version(EnvType::Conda, "3.12.1rc1").is_ok());
        assert!(matches!(
            check_python_version(EnvType::Conda, "latest"),
            Err(UsageError::InvalidPythonVersion { .. })
        ));
        assert!(matches!(
            check_python_version(EnvType::NamedVenv, "3.12"),
            Err(UsageError::PythonVersionUnsupported { .. })
        ));
    }

    proptest! {
        #[test]
        fn dev_schemes_get_suffix(basename in "[a-z][a-z0-9-]{0,20}") {
            for env_type in [EnvType::NamedVenv, EnvType::Pyenv, EnvType::Conda] {
                for scheme in ReqScheme::ALL {
                    let name = default_env_name(env_type, Some(scheme), Some(&basename)).unwrap();
                    if scheme.is_dev() {
                        prop_assert_eq!(name, format!("{basename}-dev"));
                    } else {
                        prop_assert_eq!(name, basename.clone());
                    }
                }
            }
        }
    }
}
