//! Commands that create and delete environments

use pyvenv_config::constants::{CONDA, CONDA_DEFAULT_PYTHON_VERSION, PYENV};
use pyvenv_platform::PlatformCommand;
use std::path::PathBuf;

use crate::interpreter::Interpreter;
use crate::spec::{EnvSpec, Target};

/// How an existing environment is deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// Delete the directory tree at this absolute path.
    Tree(PathBuf),
    /// Ask the backend tool to delete it.
    Command(PlatformCommand),
}

/// The backend invocation that creates `spec`.
///
/// `force` makes conda skip its confirmation prompt.
#[must_use]
pub fn create_command(
    spec: &EnvSpec,
    interpreter: &Interpreter,
    python_version: Option<&str>,
    force: bool,
) -> PlatformCommand {
    let mut cmd = match spec.target() {
        Target::Directory { path } => {
            let mut cmd = PlatformCommand::from_argv(interpreter.command(), ["-m", "venv"]);
            cmd.arg(path.display().to_string());
            cmd
        }
        Target::Pyenv { name } => {
            let mut cmd = PlatformCommand::from_argv(PYENV, ["virtualenv"]);
            if let Some(version) = python_version {
                cmd.arg(version);
            }
            cmd.arg(name);
            cmd
        }
        Target::Conda { .. } | Target::CondaPrefix { .. } => {
            let mut cmd = PlatformCommand::from_argv(CONDA, ["create", "--quiet"]);
            if force {
                cmd.arg("--yes");
            }
            cmd.args(spec.conda_selector());
            cmd.arg(format!(
                "python={}",
                python_version.unwrap_or(CONDA_DEFAULT_PYTHON_VERSION)
            ));
            cmd
        }
    };
    cmd.current_dir(spec.project_dir());
    cmd
}

/// How to delete `spec`.
///
/// `force` skips the pyenv and conda confirmation prompts.
#[must_use]
pub fn removal(spec: &EnvSpec, force: bool) -> Removal {
    let mut cmd = match spec.target() {
        Target::Directory { .. } => {
            return Removal::Tree(spec.abs_dir().unwrap_or_default());
        }
        Target::Pyenv { name } => {
            let mut cmd = PlatformCommand::from_argv(PYENV, ["virtualenv-delete"]);
            if force {
                cmd.arg("-f");
            }
            cmd.arg(name);
            cmd
        }
        Target::Conda { .. } | Target::CondaPrefix { .. } => {
            let mut cmd = PlatformCommand::from_argv(CONDA, ["env", "remove", "--quiet"]);
            if force {
                cmd.arg("--yes");
            }
            cmd.args(spec.conda_selector());
            cmd
        }
    };
    cmd.current_dir(spec.project_dir());
    Removal::Command(cmd)
}
