//! python-venv - Create, remove and replace Python virtual environments
//!
//! This is the CLI application. It merges configuration, builds the
//! operations context and renders the events the ops crate emits while a
//! plan is printed or executed.

mod cli;
mod completion;
mod error;
mod events;
mod logging;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use pyvenv_config::{constants, Config};
use pyvenv_events::EventReceiver;
use pyvenv_ops::{EnvRequest, OperationResult, OpsContextBuilder, OpsCtx};
use pyvenv_platform::{clean_process_environment, Platform};
use pyvenv_types::{Action, ColorChoice};
use std::path::{Path, PathBuf};
use std::process;
use tokio::select;
use tracing::{debug, error, info};

const PROGRAM: &str = "python-venv";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.debug);

    if let Err(e) = run(cli).await {
        error!(exit_code = e.exit_code(), "Application error: {e}");
        eprintln!("{PROGRAM}: error: {e}");
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    debug!("Starting {PROGRAM} v{}", env!("CARGO_PKG_VERSION"));

    let (action, env, python_version) = match cli.command {
        Commands::Completion { bash, absolute } => return completion::run(bash, absolute),
        Commands::Create {
            env,
            python_version,
        } => (Action::Create, env, python_version),
        Commands::Remove { env } => (Action::Remove, env, None),
        Commands::Replace {
            env,
            python_version,
        } => (Action::Replace, env, python_version),
    };

    // Load configuration with proper precedence:
    // 1. Start with file config (or defaults)
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;

    // 2. Merge environment variables
    config.merge_env()?;

    // 3. Apply CLI flags (highest precedence)
    apply_cli_config(&mut config, &cli.global);

    let project_dir = resolve_project_dir(&env.project_dir).await?;
    debug!(project_dir = %project_dir.display(), "resolved project directory");

    let (event_sender, event_receiver) = pyvenv_events::channel();

    let ops_ctx = OpsContextBuilder::new()
        .with_platform(Platform::current())
        .with_event_sender(event_sender)
        .with_config(config.clone())
        .with_project_dir(project_dir)
        .with_dry_run(env.dry_run)
        .with_base_env(clean_process_environment())
        .build()?;

    let colors_enabled = match config.general.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => console::Term::stderr().features().colors_supported(),
    };
    let trace_prefix = std::env::var(constants::env_vars::TRACE_PREFIX)
        .unwrap_or_else(|_| constants::DEFAULT_TRACE_PREFIX.to_string());
    let mut event_handler = EventHandler::new(colors_enabled, cli.global.debug)
        .with_dry_run(env.dry_run)
        .with_trace_prefix(trace_prefix);

    let request = env.to_request(python_version);
    let result = execute_command_with_events(
        action,
        request,
        ops_ctx,
        event_receiver,
        &mut event_handler,
    )
    .await?;

    let report = result.report();
    info!(
        action = %report.action,
        env_name = %report.env_name,
        commands = report.commands.len(),
        duration_ms = report.duration_ms,
        dry_run = matches!(result, OperationResult::DryRun(_)),
        "Command completed successfully"
    );
    Ok(())
}

/// Execute command with concurrent event handling
async fn execute_command_with_events(
    action: Action,
    request: EnvRequest,
    ops_ctx: OpsCtx,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<OperationResult, CliError> {
    let mut command_future = Box::pin(execute_command(action, request, ops_ctx));

    loop {
        // Render pending output before letting a child process write to the terminal
        select! {
            biased;

            event = event_receiver.recv() => {
                match event {
                    Some(event) => event_handler.handle_event(event),
                    None => { /* Channel closed: keep waiting for command to finish */ }
                }
            }

            result = &mut command_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result;
            }
        }
    }
}

/// Execute the specified action
async fn execute_command(
    action: Action,
    request: EnvRequest,
    ctx: OpsCtx,
) -> Result<OperationResult, CliError> {
    let result = match action {
        Action::Create => pyvenv_ops::create(&ctx, &request).await?,
        Action::Remove => pyvenv_ops::remove(&ctx, &request).await?,
        Action::Replace => pyvenv_ops::replace(&ctx, &request).await?,
    };
    Ok(result)
}

/// Setup logging
///
/// `RUST_LOG` always wins. Otherwise only warnings are shown, and `--debug`
/// turns on debug output for the workspace crates.
fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "warn,python_venv=debug,pyvenv_ops=debug,pyvenv_env=debug,pyvenv_project=debug,\
         pyvenv_requirements=debug,pyvenv_platform=debug,pyvenv_config=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(debug)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

/// Apply CLI configuration overrides (highest precedence)
fn apply_cli_config(config: &mut Config, global: &cli::GlobalArgs) {
    if let Some(color) = global.color {
        config.general.color = color;
    }
}

/// Absolute form of the `-C` directory, which must exist
async fn resolve_project_dir(dir: &Path) -> Result<PathBuf, CliError> {
    let absolute = std::path::absolute(dir)?;
    match tokio::fs::metadata(&absolute).await {
        Ok(metadata) if metadata.is_dir() => Ok(absolute),
        Ok(_) => Err(CliError::InvalidArguments(format!(
            "not a directory: {}",
            dir.display()
        ))),
        Err(e) => Err(CliError::InvalidArguments(format!(
            "cannot use project directory {}: {e}",
            dir.display()
        ))),
    }
}
