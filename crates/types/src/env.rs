//! Environment backends and how their environments are named

use pyvenv_errors::UsageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of virtual environment to manage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvType {
    /// `python -m venv .venv` in the project directory
    Venv,
    /// `python -m venv` in a shared directory, named after the project
    NamedVenv,
    /// `pyenv virtualenv`
    Pyenv,
    /// `conda create`
    Conda,
}

impl EnvType {
    pub const ALL: [Self; 4] = [Self::Venv, Self::NamedVenv, Self::Pyenv, Self::Conda];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Venv => "venv",
            Self::NamedVenv => "named-venv",
            Self::Pyenv => "pyenv",
            Self::Conda => "conda",
        }
    }

    /// Every environment type uses exactly one naming scheme.
    #[must_use]
    pub fn naming_scheme(self) -> NamingScheme {
        match self {
            Self::Venv => NamingScheme::Anonymous,
            Self::NamedVenv | Self::Pyenv | Self::Conda => NamingScheme::Named,
        }
    }

    /// Whether `--python-version` means anything for this backend.
    #[must_use]
    pub fn accepts_python_version(self) -> bool {
        matches!(self, Self::Pyenv | Self::Conda)
    }

    /// Whether the environment is populated with the pip bootstrap packages
    /// right after creation.
    #[must_use]
    pub fn bootstraps_pip(self) -> bool {
        !matches!(self, Self::Conda)
    }
}

impl Default for EnvType {
    fn default() -> Self {
        Self::Venv
    }
}

impl fmt::Display for EnvType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvType {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UsageError::InvalidValue {
                what: "environment type".to_string(),
                value: s.to_string(),
            })
    }
}

impl clap::ValueEnum for EnvType {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// How an environment's name is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingScheme {
    /// Fixed relative directory inside the project
    Anonymous,
    /// The project basename, plus a suffix for development schemes
    Named,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_venv_is_anonymous() {
        for env_type in EnvType::ALL {
            let expected = if env_type == EnvType::Venv {
                NamingScheme::Anonymous
            } else {
                NamingScheme::Named
            };
            assert_eq!(env_type.naming_scheme(), expected, "{env_type}");
        }
    }

    #[test]
    fn parses_cli_spelling() {
        assert_eq!("named-venv".parse::<EnvType>().unwrap(), EnvType::NamedVenv);
        assert!("virtualenv".parse::<EnvType>().is_err());
    }
}
