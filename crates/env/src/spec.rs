//! Resolved environment identity

use pyvenv_config::constants::{CONDA, PYENV, PYENV_VERSION};
use pyvenv_requirements::EnvPython;
use pyvenv_types::{EnvType, NamingScheme};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::interpreter::Interpreter;

/// Where a backend keeps an environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A venv directory; relative paths are relative to the project.
    Directory { path: PathBuf },
    Pyenv { name: String },
    Conda { name: String },
    /// A conda environment addressed by its absolute prefix path.
    CondaPrefix { path: PathBuf },
}

/// Everything known about one environment, derived once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSpec {
    env_type: EnvType,
    env_name: String,
    target: Target,
    project_dir: PathBuf,
}

fn absolute(project_dir: &Path, path: &Path) -> PathBuf {
    project_dir.join(path).components().collect()
}

impl EnvSpec {
    /// Resolve where `env_name` lives for `env_type`.
    ///
    /// `venvs_dir` is only used by `named-venv`. A conda name containing a
    /// path separator addresses the environment by prefix.
    #[must_use]
    pub fn new(env_type: EnvType, env_name: String, venvs_dir: &Path, project_dir: &Path) -> Self {
        let target = match env_type {
            EnvType::Venv => Target::Directory {
                path: PathBuf::from(&env_name),
            },
            EnvType::NamedVenv => Target::Directory {
                path: venvs_dir.join(&env_name),
            },
            EnvType::Pyenv => Target::Pyenv {
                name: env_name.clone(),
            },
            EnvType::Conda if env_name.contains(['/', MAIN_SEPARATOR]) => Target::CondaPrefix {
                path: absolute(project_dir, Path::new(&env_name)),
            },
            EnvType::Conda => Target::Conda {
                name: env_name.clone(),
            },
        };

        Self {
            env_type,
            env_name,
            target,
            project_dir: project_dir.to_path_buf(),
        }
    }

    #[must_use]
    pub fn env_type(&self) -> EnvType {
        self.env_type
    }

    #[must_use]
    pub fn naming_scheme(&self) -> NamingScheme {
        self.env_type.naming_scheme()
    }

    #[must_use]
    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    #[must_use]
    pub fn target(&self) -> &Target {
        &self.target
    }

    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Absolute directory of environments that live at a known path.
    #[must_use]
    pub fn abs_dir(&self) -> Option<PathBuf> {
        match &self.target {
            Target::Directory { path } => Some(absolute(&self.project_dir, path)),
            Target::CondaPrefix { path } => Some(path.clone()),
            Target::Pyenv { .. } | Target::Conda { .. } => None,
        }
    }

    /// Whether finding out if the environment exists means running the
    /// backend tool rather than looking at the filesystem.
    #[must_use]
    pub fn lookup_needs_process(&self) -> bool {
        matches!(self.target, Target::Pyenv { .. } | Target::Conda { .. })
    }

    /// Human-readable description used in progress messages.
    #[must_use]
    pub fn description(&self) -> String {
        match &self.target {
            Target::Directory { path } => format!("Python venv at {}", path.display()),
            Target::Pyenv { name } => format!("pyenv environment {name}"),
            Target::Conda { .. } | Target::CondaPrefix { .. } => {
                format!("conda environment {}", self.env_name)
            }
        }
    }

    /// Conda's selector arguments for this environment.
    pub(crate) fn conda_selector(&self) -> Vec<String> {
        match &self.target {
            Target::CondaPrefix { path } => vec!["-p".to_string(), path.display().to_string()],
            _ => vec!["-n".to_string(), self.env_name.clone()],
        }
    }

    /// How to run the interpreter inside this environment.
    #[must_use]
    pub fn env_python(&self, interpreter: &Interpreter) -> EnvPython {
        let base = interpreter.base_name();
        match &self.target {
            Target::Directory { path } => EnvPython::direct(
                path.join("bin").join(base).display().to_string(),
                &self.project_dir,
            ),
            Target::Pyenv { name } => {
                EnvPython::launched(PYENV, ["exec", base], &self.project_dir)
                    .with_env(PYENV_VERSION, name)
            }
            Target::Conda { .. } | Target::CondaPrefix { .. } => {
                let mut prefix = vec!["run".to_string(), "--no-capture-output".to_string()];
                prefix.extend(self.conda_selector());
                prefix.push(base.to_string());
                EnvPython::launched(CONDA, prefix, &self.project_dir)
            }
        }
    }

    /// Shell command that activates the environment.
    #[must_use]
    pub fn activation_command(&self) -> String {
        match &self.target {
            Target::Directory { path } => {
                format!("source {}", path.join("bin").join("activate").display())
            }
            Target::Pyenv { name } => format!("pyenv activate {name}"),
            Target::Conda { .. } | Target::CondaPrefix { .. } => {
                format!("conda activate {}", self.env_name)
            }
        }
    }
}
