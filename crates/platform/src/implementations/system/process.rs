//! Process operations on the host system
//!
//! Wraps `tokio::process::Command` with event emission and error mapping.
//! Commands start from the context's base environment when one is set.

use async_trait::async_trait;
use pyvenv_errors::{Error, PlatformError};
use pyvenv_events::{AppEvent, EventEmitter, FailureContext, ProcessEvent};
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;

use crate::core::PlatformContext;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

/// Host implementation of process operations
pub struct SystemProcessOperations;

impl SystemProcessOperations {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemProcessOperations {
    fn default() -> Self {
        Self::new()
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Exit code of a finished process; killed processes report `128 + signal`.
#[must_use]
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

fn build_command(ctx: &PlatformContext, cmd: &PlatformCommand) -> Command {
    let mut command = Command::new(cmd.program());
    command.args(cmd.get_args());

    if let Some(dir) = cmd.get_current_dir() {
        command.current_dir(dir);
    }

    if let Some(base) = ctx.base_env() {
        command.env_clear();
        command.envs(base);
    }

    for (key, value) in cmd.get_env_vars() {
        command.env(key, value);
    }

    command
}

fn spawn_error(cmd: &PlatformCommand, err: &std::io::Error) -> PlatformError {
    if err.kind() == std::io::ErrorKind::NotFound {
        PlatformError::CommandNotFound {
            command: cmd.program().to_string(),
        }
    } else {
        PlatformError::ProcessExecutionFailed {
            command: cmd.to_string(),
            message: err.to_string(),
        }
    }
}

fn emit_started(ctx: &PlatformContext, cmd: &PlatformCommand) {
    ctx.emit(AppEvent::Process(ProcessEvent::Started {
        program: cmd.program().to_string(),
        args: cmd.get_args().to_vec(),
        cwd: cmd.get_current_dir().cloned(),
    }));
}

fn emit_finished(
    ctx: &PlatformContext,
    cmd: &PlatformCommand,
    result: &Result<i32, PlatformError>,
    duration: Duration,
) {
    let event = match result {
        Ok(code) => ProcessEvent::Completed {
            command: cmd.to_string(),
            exit_code: *code,
            duration_ms: duration_to_millis(duration),
        },
        Err(e) => ProcessEvent::Failed {
            command: cmd.to_string(),
            failure: FailureContext::from_error(e),
        },
    };
    ctx.emit(AppEvent::Process(event));
}

#[async_trait]
impl ProcessOperations for SystemProcessOperations {
    async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, Error> {
        let start = Instant::now();
        emit_started(ctx, &cmd);

        let result = build_command(ctx, &cmd)
            .stdin(Stdio::null())
            .output()
            .await
            .map(|output| CommandOutput {
                code: exit_code(output.status),
                stdout: output.stdout,
                stderr: output.stderr,
            })
            .map_err(|e| spawn_error(&cmd, &e));

        let summary = result.as_ref().map(|o| o.code).map_err(Clone::clone);
        emit_finished(ctx, &cmd, &summary, start.elapsed());

        result.map_err(Error::from)
    }

    async fn run_attached(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<i32, Error> {
        let start = Instant::now();
        emit_started(ctx, &cmd);
        debug!(command = %cmd, "running attached command");

        let result = match build_command(ctx, &cmd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
        {
            Ok(mut child) => child
                .wait()
                .await
                .map(exit_code)
                .map_err(|e| spawn_error(&cmd, &e)),
            Err(e) => Err(spawn_error(&cmd, &e)),
        };

        emit_finished(ctx, &cmd, &result, start.elapsed());
        result.map_err(Error::from)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::environment::clean_environment;

    #[tokio::test]
    async fn captures_stdout_and_exit_code() {
        let ops = SystemProcessOperations::new();
        let ctx = PlatformContext::new(None);
        let cmd = PlatformCommand::from_argv("sh", ["-c", "echo hello; exit 3"]);
        let output = ops.execute_command(&ctx, cmd).await.unwrap();
        assert_eq!(output.code, 3);
        assert_eq!(output.stdout_text(), "hello");
    }

    #[tokio::test]
    async fn missing_program_is_command_not_found() {
        let ops = SystemProcessOperations::new();
        let ctx = PlatformContext::new(None);
        let cmd = PlatformCommand::new("definitely-not-a-real-program-for-pyvenv");
        let err = ops.run_attached(&ctx, cmd).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Platform(PlatformError::CommandNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn base_env_replaces_inherited_environment() {
        let ops = SystemProcessOperations::new();
        let base = clean_environment([("PATH", "/usr/bin:/bin"), ("ONLY_THIS", "yes")]);
        let ctx = PlatformContext::new(None).with_base_env(base);

        let mut cmd = PlatformCommand::from_argv(
            "sh",
            ["-c", "printf '%s/%s' \"$ONLY_THIS\" \"${EXTRA:-unset}\""],
        );
        cmd.env("EXTRA", "set");
        let output = ops.execute_command(&ctx, cmd).await.unwrap();
        assert_eq!(output.stdout_text(), "yes/set");
    }

    #[tokio::test]
    async fn emits_process_events() {
        let (tx, mut rx) = pyvenv_events::channel();
        let ops = SystemProcessOperations::new();
        let ctx = PlatformContext::new(Some(tx));
        ops.run_attached(&ctx, PlatformCommand::from_argv("sh", ["-c", "exit 0"]))
            .await
            .unwrap();

        let started = rx.recv().await.unwrap();
        assert!(matches!(
            started.event,
            AppEvent::Process(ProcessEvent::Started { .. })
        ));
        let completed = rx.recv().await.unwrap();
        assert!(matches!(
            completed.event,
            AppEvent::Process(ProcessEvent::Completed { exit_code: 0, .. })
        ));
    }
}
