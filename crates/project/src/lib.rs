#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Python project metadata lookup
//!
//! Environment names and build artifact names come from the project in the
//! working directory. Static metadata in `pyproject.toml` is read directly;
//! anything it does not declare is asked of `python setup.py`.

mod pyproject;

use pyvenv_config::constants::{PYPROJECT_TOML, SETUP_PY};
use pyvenv_errors::{Error, PlatformError, ProjectError};
use pyvenv_platform::{PathKind, Platform, PlatformCommand, PlatformContext};
use std::path::Path;
use tracing::debug;

pub use pyproject::PyProject;

/// Name and version of the project being worked on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub name: String,
    pub version: Option<String>,
}

impl ProjectMetadata {
    /// Basename used for environment names: the project name with
    /// underscores turned into hyphens.
    #[must_use]
    pub fn basename(&self) -> String {
        basename_from_name(&self.name)
    }

    /// Name as it appears in sdist and wheel file names.
    #[must_use]
    pub fn dist_name(&self) -> String {
        dist_name_from_name(&self.name)
    }
}

#[must_use]
pub fn basename_from_name(name: &str) -> String {
    name.replace('_', "-")
}

#[must_use]
pub fn dist_name_from_name(name: &str) -> String {
    name.replace(['-', '.'], "_")
}

/// What the caller needs to know about the project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    NameOnly,
    NameAndVersion,
}

/// Look up project metadata in `project_dir`.
///
/// `python` is the interpreter used to run `setup.py` when static
/// metadata is incomplete.
///
/// # Errors
///
/// Returns an error when there is no project, the metadata cannot be read,
/// or a required field cannot be determined.
pub async fn lookup(
    platform: &Platform,
    ctx: &PlatformContext,
    project_dir: &Path,
    python: &str,
    what: Lookup,
) -> Result<ProjectMetadata, Error> {
    let pyproject_path = project_dir.join(PYPROJECT_TOML);
    let mut name = None;
    let mut version = None;

    if platform.filesystem().is_file(ctx, &pyproject_path).await {
        let contents = platform
            .filesystem()
            .read_to_string(ctx, &pyproject_path)
            .await?;
        let pyproject = PyProject::parse(&contents).map_err(|message| {
            ProjectError::InvalidMetadata {
                path: pyproject_path.display().to_string(),
                message,
            }
        })?;
        name = pyproject.name().map(str::to_string);
        version = pyproject.version().map(str::to_string);
        debug!(?name, ?version, "read static metadata from pyproject.toml");
    }

    let complete = name.is_some() && (version.is_some() || what == Lookup::NameOnly);
    if !complete {
        let setup_py = project_dir.join(SETUP_PY);
        if platform.filesystem().path_kind(ctx, &setup_py).await == PathKind::Missing {
            if name.is_none() && version.is_none() {
                return Err(ProjectError::NoProject {
                    dir: project_dir.display().to_string(),
                }
                .into());
            }
        } else {
            if name.is_none() {
                name = Some(query_setup_py(platform, ctx, project_dir, python, "--name").await?);
            }
            if version.is_none() && what == Lookup::NameAndVersion {
                version =
                    Some(query_setup_py(platform, ctx, project_dir, python, "--version").await?);
            }
        }
    }

    let name = name.ok_or_else(|| ProjectError::MissingField {
        dir: project_dir.display().to_string(),
        field: "name".to_string(),
    })?;
    if what == Lookup::NameAndVersion && version.is_none() {
        return Err(ProjectError::MissingField {
            dir: project_dir.display().to_string(),
            field: "version".to_string(),
        }
        .into());
    }

    Ok(ProjectMetadata { name, version })
}

async fn query_setup_py(
    platform: &Platform,
    ctx: &PlatformContext,
    project_dir: &Path,
    python: &str,
    flag: &str,
) -> Result<String, Error> {
    let mut cmd = PlatformCommand::from_argv(python, [SETUP_PY, flag]);
    cmd.current_dir(project_dir);
    let rendered = cmd.to_string();
    debug!(command = %rendered, "querying setup.py");

    let output = platform
        .process()
        .execute_command(ctx, cmd)
        .await
        .map_err(|e| match e {
            Error::Platform(PlatformError::CommandNotFound { .. }) => e,
            other => ProjectError::QueryFailed {
                command: rendered.clone(),
                message: other.to_string(),
            }
            .into(),
        })?;

    if !output.success() {
        return Err(ProjectError::QueryFailed {
            command: rendered,
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    // setup.py may print warnings before the answer
    let text = output.stdout_text();
    let value = text.lines().last().unwrap_or_default().trim().to_string();
    if value.is_empty() {
        return Err(ProjectError::QueryFailed {
            command: rendered,
            message: "no output".to_string(),
        }
        .into());
    }
    Ok(value)
}
