//! Requirement schemes
//!
//! A scheme names a strategy for deciding what gets installed into a
//! freshly created environment. What each scheme expands to lives in the
//! `pyvenv-requirements` crate; this type only carries the identity and a
//! couple of classification predicates.

use pyvenv_errors::UsageError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReqScheme {
    Plain,
    Dev,
    Devplus,
    Frozen,
    Package,
    Pip,
    Source,
    Wheel,
}

impl ReqScheme {
    pub const ALL: [Self; 8] = [
        Self::Plain,
        Self::Dev,
        Self::Devplus,
        Self::Frozen,
        Self::Package,
        Self::Pip,
        Self::Source,
        Self::Wheel,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Dev => "dev",
            Self::Devplus => "devplus",
            Self::Frozen => "frozen",
            Self::Package => "package",
            Self::Pip => "pip",
            Self::Source => "source",
            Self::Wheel => "wheel",
        }
    }

    /// Development schemes get their own named environments.
    #[must_use]
    pub fn is_dev(self) -> bool {
        matches!(self, Self::Dev | Self::Devplus)
    }

    /// Schemes that build a distribution of the project before installing it.
    #[must_use]
    pub fn builds_artifact(self) -> bool {
        matches!(self, Self::Source | Self::Wheel)
    }
}

impl fmt::Display for ReqScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReqScheme {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == s)
            .ok_or_else(|| UsageError::InvalidValue {
                what: "requirements scheme".to_string(),
                value: s.to_string(),
            })
    }
}

impl clap::ValueEnum for ReqScheme {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}
