//! Existence checks

use pyvenv_config::constants::{CONDA, PYENV};
use pyvenv_errors::{EnvError, Error, PlatformError};
use pyvenv_platform::{PathKind, Platform, PlatformCommand, PlatformContext};
use tracing::debug;

use crate::spec::{EnvSpec, Target};

/// Find `name` in the output of `conda env list` and return its prefix.
///
/// The active environment is marked with `*` between name and prefix.
#[must_use]
pub fn find_conda_env<'a>(listing: &'a str, name: &str) -> Option<&'a str> {
    listing
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .find_map(|line| {
            let (env, rest) = line.split_once(char::is_whitespace)?;
            let rest = rest.trim_start();
            let prefix = rest.strip_prefix('*').map_or(rest, str::trim_start);
            (env == name && !prefix.is_empty()).then_some(prefix)
        })
}

/// Tell whether the environment described by `spec` exists.
///
/// # Errors
///
/// Fails when something other than a directory occupies a venv or conda
/// prefix path, or when the backend tool cannot be queried.
pub async fn env_exists(
    platform: &Platform,
    ctx: &PlatformContext,
    spec: &EnvSpec,
) -> Result<bool, Error> {
    match spec.target() {
        Target::Directory { .. } | Target::CondaPrefix { .. } => {
            let dir = spec.abs_dir().unwrap_or_default();
            match platform.filesystem().path_kind(ctx, &dir).await {
                PathKind::Directory => Ok(true),
                PathKind::Missing => Ok(false),
                PathKind::Other => Err(EnvError::Occluded {
                    path: dir.display().to_string(),
                }
                .into()),
            }
        }
        Target::Pyenv { name } => {
            let mut cmd = PlatformCommand::from_argv(PYENV, ["prefix", name.as_str()]);
            cmd.current_dir(spec.project_dir());
            let output = platform.process().execute_command(ctx, cmd).await?;
            debug!(env = %name, exists = output.success(), "pyenv prefix");
            Ok(output.success())
        }
        Target::Conda { name } => {
            let mut cmd = PlatformCommand::from_argv(CONDA, ["env", "list"]);
            cmd.current_dir(spec.project_dir());
            let rendered = cmd.to_string();
            let output = platform.process().execute_command(ctx, cmd).await?;
            if !output.success() {
                return Err(PlatformError::CommandFailed {
                    command: rendered,
                    code: output.code,
                }
                .into());
            }
            let listing = output.stdout_text();
            let prefix = find_conda_env(&listing, name);
            debug!(env = %name, ?prefix, "conda env list");
            Ok(prefix.is_some())
        }
    }
}
