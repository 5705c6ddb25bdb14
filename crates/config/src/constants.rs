//! Fixed names shared by the planning crates
//!
//! None of these are read from the config file. They are the conventions of
//! the Python tooling we drive.

/// Interpreter used when neither the config file nor the environment names one.
pub const PYTHON: &str = "python3";

/// Directory of an anonymous venv, relative to the project.
pub const VENV_DIR: &str = ".venv";

/// Directory holding named venvs, relative to the home directory.
pub const VENVS_DIR: &str = ".venvs";

/// Appended to named environments built from development schemes.
pub const DEV_SUFFIX: &str = "-dev";

pub const CONDA: &str = "conda";
pub const PYENV: &str = "pyenv";

/// Interpreter version conda installs when none is requested.
pub const CONDA_DEFAULT_PYTHON_VERSION: &str = "3";

pub const PYENV_VERSION: &str = "PYENV_VERSION";

/// Packages every pip-managed environment is upgraded to right after creation.
pub const BOOTSTRAP_PACKAGES: &[&str] = &["pip", "setuptools", "wheel"];

/// Extra bootstrap package needed by schemes that build the project.
pub const BUILD_FRONTEND: &str = "build";

/// Directory build artifacts are written to, relative to the project.
pub const DIST_DIR: &str = "dist";

pub const PYPROJECT_TOML: &str = "pyproject.toml";
pub const SETUP_PY: &str = "setup.py";

pub const MESSAGE_PREFIX: &str = "==> ";
pub const DRY_RUN_PREFIX: &str = "[DRY-RUN] ";
pub const DEFAULT_TRACE_PREFIX: &str = "+ ";

/// Environment variables read by the CLI.
pub mod env_vars {
    pub const PYTHON: &str = "PYTHON_VENV_PYTHON";
    pub const PYTHON_VERSION: &str = "PYTHON_VENV_PYTHON_VERSION";
    pub const VENVS_DIR: &str = "PYTHON_VENV_VENVS_DIR";
    pub const COLOR: &str = "PYTHON_VENV_COLOR";
    pub const TRACE_PREFIX: &str = "PS4";
}
