//! Installer invocations run inside an environment

use pyvenv_config::constants::{BOOTSTRAP_PACKAGES, BUILD_FRONTEND, DIST_DIR};
use pyvenv_platform::PlatformCommand;
use pyvenv_types::ReqScheme;
use std::path::{Path, PathBuf};

use crate::sources::Sources;

/// How to launch the Python interpreter of an environment.
///
/// For venvs this is simply the interpreter inside the environment; pyenv
/// and conda need a launcher command in front of it and possibly
/// environment variables selecting the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvPython {
    program: String,
    prefix: Vec<String>,
    env: Vec<(String, String)>,
    cwd: PathBuf,
}

impl EnvPython {
    /// Interpreter invoked directly, e.g. `.venv/bin/python3`.
    pub fn direct(interpreter: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: interpreter.into(),
            prefix: Vec::new(),
            env: Vec::new(),
            cwd: cwd.into(),
        }
    }

    /// Interpreter reached through a launcher, e.g. `pyenv exec python3`.
    pub fn launched<I, S>(program: impl Into<String>, prefix: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            prefix: prefix.into_iter().map(Into::into).collect(),
            env: Vec::new(),
            cwd: cwd.into(),
        }
    }

    /// Set an environment variable on every command this launcher builds.
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// `<python> <args...>`
    pub fn command<I, S>(&self, args: I) -> PlatformCommand
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cmd = PlatformCommand::from_argv(&self.program, &self.prefix);
        cmd.args(args).current_dir(&self.cwd);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }

    /// `<python> -m <module> <args...>`
    pub fn module<I, S>(&self, module: &str, args: I) -> PlatformCommand
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cmd = self.command(["-m", module]);
        cmd.args(args);
        cmd
    }
}

/// Upgrade the packaging toolchain of a fresh environment.
///
/// Schemes that build the project also get the `build` frontend.
#[must_use]
pub fn bootstrap_command(python: &EnvPython, scheme: ReqScheme) -> PlatformCommand {
    let mut cmd = python.module("pip", ["install", "--upgrade"]);
    cmd.args(BOOTSTRAP_PACKAGES);
    if scheme.builds_artifact() {
        cmd.arg(BUILD_FRONTEND);
    }
    cmd
}

/// Installer invocations for `sources`, in execution order.
///
/// A project build comes first; everything pip installs then goes into a
/// single `pip install`, ordered files, packages, pass-through arguments,
/// built artifact.
#[must_use]
pub fn install_commands(python: &EnvPython, sources: &Sources) -> Vec<PlatformCommand> {
    let mut commands = Vec::new();

    if let Some(artifact) = &sources.artifact {
        commands.push(python.module(
            BUILD_FRONTEND,
            [artifact.kind.build_flag(), "--outdir", DIST_DIR, "."],
        ));
    }

    if sources.is_empty() {
        return commands;
    }

    let mut pip = python.module("pip", ["install"]);
    for file in &sources.files {
        pip.arg("-r").arg(file);
    }
    pip.args(&sources.packages);
    pip.args(&sources.pip_args);
    if let Some(artifact) = &sources.artifact {
        pip.arg(artifact.path());
    }
    commands.push(pip);

    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn venv_python() -> EnvPython {
        EnvPython::direct(".venv/bin/python3", "/work/proj")
    }

    fn rendered(commands: &[PlatformCommand]) -> Vec<String> {
        commands.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn bootstrap_adds_build_for_artifact_schemes() {
        let python = venv_python();
        assert_eq!(
            bootstrap_command(&python, ReqScheme::Plain).to_string(),
            ".venv/bin/python3 -m pip install --upgrade pip setuptools wheel"
        );
        assert_eq!(
            bootstrap_command(&python, ReqScheme::Source).to_string(),
            ".venv/bin/python3 -m pip install --upgrade pip setuptools wheel build"
        );
    }

    #[test]
    fn plain_scheme_installs_requirements_file() {
        let sources = Sources::for_scheme(ReqScheme::Plain, "proj", &[], None);
        let commands = install_commands(&venv_python(), &sources);
        assert_eq!(
            rendered(&commands),
            vec![".venv/bin/python3 -m pip install -r requirements.txt"]
        );
        assert_eq!(
            commands[0].get_current_dir().map(PathBuf::as_path),
            Some(Path::new("/work/proj"))
        );
    }

    #[test]
    fn source_scheme_builds_then_installs() {
        let sources = Sources::for_scheme(
            ReqScheme::Source,
            "my-pkg",
            &[],
            Some(("my_pkg", "0.3.1")),
        );
        assert_eq!(
            rendered(&install_commands(&venv_python(), &sources)),
            vec![
                ".venv/bin/python3 -m build --sdist --outdir dist .",
                ".venv/bin/python3 -m pip install dist/my_pkg-0.3.1.tar.gz",
            ]
        );
    }

    #[test]
    fn conda_launcher_prefixes_every_command() {
        let python = EnvPython::launched(
            "conda",
            ["run", "--no-capture-output", "-n", "foo", "python3"],
            "/work/proj",
        );
        let sources = Sources::for_scheme(ReqScheme::Package, "foo", &[], None);
        assert_eq!(
            rendered(&install_commands(&python, &sources)),
            vec!["conda run --no-capture-output -n foo python3 -m pip install foo"]
        );
    }

    #[test]
    fn pyenv_launcher_sets_selected_version() {
        let python = EnvPython::launched("pyenv", ["exec", "python3"], "/work/proj")
            .with_env("PYENV_VERSION", "proj-dev");
        let cmd = bootstrap_command(&python, ReqScheme::Dev);
        assert_eq!(
            cmd.get_env_vars(),
            &[("PYENV_VERSION".to_string(), "proj-dev".to_string())]
        );
        assert_eq!(
            cmd.to_string(),
            "PYENV_VERSION=proj-dev pyenv exec python3 -m pip install --upgrade pip setuptools wheel"
        );
    }

    #[test]
    fn empty_sources_install_nothing() {
        let sources = Sources::for_scheme(ReqScheme::Pip, "proj", &[], None);
        assert!(install_commands(&venv_python(), &sources).is_empty());
    }

    proptest! {
        #[test]
        fn pip_args_are_passed_through_verbatim(
            args in proptest::collection::vec("[a-z][a-z0-9=<>.-]{0,12}", 1..6)
        ) {
            let sources = Sources::for_scheme(ReqScheme::Pip, "proj", &args, None);
            let commands = install_commands(&venv_python(), &sources);
            prop_assert_eq!(commands.len(), 1);
            let tail = &commands[0].get_args()[3..];
            prop_assert_eq!(tail, args.as_slice());
        }
    }
}
