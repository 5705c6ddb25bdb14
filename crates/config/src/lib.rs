#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for python-venv
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/python-venv/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;

use pyvenv_errors::{ConfigError, Error};
use pyvenv_types::ColorChoice;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub python: PythonConfig,

    #[serde(default)]
    pub paths: PathConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_color_choice")]
    pub color: ColorChoice,
}

/// Interpreter selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PythonConfig {
    /// Interpreter used to create environments (bare name or full path)
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    /// Interpreter version for pyenv and conda environments
    #[serde(default)]
    pub version: Option<String>,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Where named venvs live (default: ~/.venvs)
    pub venvs_dir: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            color: ColorChoice::Auto,
        }
    }
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            version: None,
        }
    }
}

// Default value functions for serde
fn default_color_choice() -> ColorChoice {
    ColorChoice::Auto
}

fn default_interpreter() -> String {
    constants::PYTHON.to_string()
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join("python-venv").join("config.toml"))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::from(ConfigError::NotFound {
                    path: path.display().to_string(),
                })
            } else {
                Error::io_with_path(&e, path)
            }
        })?;

        debug!(path = %path.display(), "loaded configuration file");

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// A missing default config file is not an error; a missing config
    /// directory (no home) simply means defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let Ok(config_path) = Self::default_path() else {
            return Ok(Self::default());
        };

        if fs::try_exists(&config_path).await.unwrap_or(false) {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// If path is provided, loads from that file.
    /// If path is None, uses the default loading behavior.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_env_from(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(_)) => {
                warn!(var = key, "ignoring environment variable that is not valid UTF-8");
                None
            }
        })
    }

    /// Merge values produced by `lookup`, keyed by environment variable name.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be parsed into the expected type.
    pub fn merge_env_from<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(color) = lookup(constants::env_vars::COLOR) {
            self.general.color = color.parse().map_err(|_| ConfigError::InvalidValue {
                field: constants::env_vars::COLOR.to_string(),
                value: color,
            })?;
        }

        if let Some(python) = lookup(constants::env_vars::PYTHON) {
            self.python.interpreter = python;
        }

        if let Some(version) = lookup(constants::env_vars::PYTHON_VERSION) {
            self.python.version = Some(version);
        }

        if let Some(venvs_dir) = lookup(constants::env_vars::VENVS_DIR) {
            self.paths.venvs_dir = Some(PathBuf::from(venvs_dir));
        }

        Ok(())
    }

    /// Directory that holds named venvs, with a leading `~` expanded.
    ///
    /// # Errors
    ///
    /// Fails when no directory is configured and there is no home directory
    /// to put the default `~/.venvs` in.
    pub fn venvs_dir(&self) -> Result<PathBuf, Error> {
        self.venvs_dir_in(dirs::home_dir().as_deref())
    }

    fn venvs_dir_in(&self, home: Option<&Path>) -> Result<PathBuf, Error> {
        match (&self.paths.venvs_dir, home) {
            (Some(dir), _) => Ok(expand_home(dir)),
            (None, Some(home)) => Ok(home.join(constants::VENVS_DIR)),
            (None, None) => {
                debug!("no home directory for the default venvs directory");
                Err(ConfigError::NoHomeDir {
                    what: "venvs directory".to_string(),
                }
                .into())
            }
        }
    }
}

/// Expand a leading `~` component to the user's home directory.
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
