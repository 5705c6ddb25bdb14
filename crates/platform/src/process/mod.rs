//! Process execution operations

use async_trait::async_trait;
use pyvenv_errors::Error;
use std::fmt;
use std::path::PathBuf;

use crate::core::PlatformContext;

/// Platform command builder
///
/// Also the unit of a command plan: it is printed verbatim in dry runs, so
/// its `Display` form is the shell-style trace line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl PlatformCommand {
    /// Create a new platform command
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: Vec::new(),
        }
    }

    /// Create a command from a program followed by its arguments
    pub fn from_argv<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut cmd = Self::new(program);
        cmd.args(args);
        cmd
    }

    /// Add an argument to the command
    pub fn arg<S: AsRef<str>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add multiple arguments to the command
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    /// Set the working directory for the command
    pub fn current_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Set an environment variable for the command only
    pub fn env(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Get the program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the arguments
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the current directory
    pub fn get_current_dir(&self) -> Option<&PathBuf> {
        self.current_dir.as_ref()
    }

    /// Get the per-command environment overrides
    pub fn get_env_vars(&self) -> &[(String, String)] {
        &self.env
    }

    /// Program followed by its arguments
    pub fn argv(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }
}

impl fmt::Display for PlatformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{key}={value} ")?;
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Output from captured command execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; 128 plus the signal number when killed by a signal
    pub code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == 0
    }

    /// Stdout decoded lossily, without the trailing newline
    #[must_use]
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout)
            .trim_end_matches(['\n', '\r'])
            .to_string()
    }
}

/// Trait for process execution operations
#[async_trait]
pub trait ProcessOperations: Send + Sync {
    /// Execute a command, capturing its output
    async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, Error>;

    /// Execute a command attached to the terminal and return its exit code
    async fn run_attached(&self, ctx: &PlatformContext, cmd: PlatformCommand)
        -> Result<i32, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_a_trace_line() {
        let mut cmd = PlatformCommand::from_argv("pyenv", ["exec", "python3", "-m", "pip"]);
        cmd.env("PYENV_VERSION", "demo").current_dir("/work");
        assert_eq!(
            cmd.to_string(),
            "PYENV_VERSION=demo pyenv exec python3 -m pip"
        );
        assert_eq!(
            cmd.argv().collect::<Vec<_>>(),
            vec!["pyenv", "exec", "python3", "-m", "pip"]
        );
    }

    #[test]
    fn stdout_text_strips_newline() {
        let output = CommandOutput {
            code: 0,
            stdout: b"/home/me/.pyenv/versions/demo\n".to_vec(),
            stderr: Vec::new(),
        };
        assert!(output.success());
        assert_eq!(output.stdout_text(), "/home/me/.pyenv/versions/demo");
    }
}
