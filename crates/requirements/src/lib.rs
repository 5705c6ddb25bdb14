#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Requirement schemes for python-venv
//!
//! Turns a [`ReqScheme`](pyvenv_types::ReqScheme) into the ordered installer
//! invocations that populate a fresh environment:
//! - [`sources`] expands a scheme into files, packages, pass-through pip
//!   arguments and an optional project build
//! - [`installer`] renders those sources as commands run by the
//!   environment's own interpreter
//! - [`check_files`] fails early when requirement files are absent

pub mod installer;
pub mod sources;

pub use installer::{bootstrap_command, install_commands, EnvPython};
pub use sources::{Artifact, ArtifactKind, Sources};

use pyvenv_errors::{Error, RequirementsError};
use pyvenv_platform::{Platform, PlatformContext};
use pyvenv_types::ReqScheme;
use std::path::Path;
use tracing::debug;

/// Verify every requirement file the scheme reads exists under `project_dir`.
///
/// # Errors
///
/// Returns [`RequirementsError::MissingFiles`] naming each absent file, in
/// scheme order.
pub async fn check_files(
    platform: &Platform,
    ctx: &PlatformContext,
    project_dir: &Path,
    scheme: ReqScheme,
) -> Result<(), Error> {
    let mut missing = Vec::new();
    for file in sources::files(scheme) {
        if !platform.filesystem().is_file(ctx, &project_dir.join(file)).await {
            missing.push((*file).to_string());
        }
    }

    if missing.is_empty() {
        debug!(%scheme, "all requirement files present");
        Ok(())
    } else {
        Err(RequirementsError::MissingFiles { files: missing }.into())
    }
}
