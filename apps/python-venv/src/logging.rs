//! Structured logging integration for events
//!
//! With `--debug`, every event the handler receives is also logged with
//! structured fields so a run can be reconstructed from the log alone.

use pyvenv_events::{AppEvent, EventMessage, GeneralEvent, PlanEvent, ProcessEvent};
use tracing::{debug, error, info};

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;

    match event {
        AppEvent::Process(process_event) => match process_event {
            ProcessEvent::Trace { command } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    command = %command,
                    "Command planned"
                );
            }
            ProcessEvent::Started { program, args, cwd } => {
                debug!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    program = %program,
                    args = ?args,
                    cwd = ?cwd,
                    lag_ms = meta.age_ms(),
                    emitted_at = %meta.timestamp,
                    "Command started"
                );
            }
            ProcessEvent::Completed {
                command,
                exit_code,
                duration_ms,
            } => {
                debug!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    command = %command,
                    exit_code = exit_code,
                    duration_ms = duration_ms,
                    "Command finished"
                );
            }
            ProcessEvent::Failed { command, failure } => {
                error!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    command = %command,
                    code = ?failure.code,
                    reason = %failure.message,
                    hint = ?failure.hint,
                    "Command could not run"
                );
            }
        },

        AppEvent::Plan(plan_event) => match plan_event {
            PlanEvent::Ready {
                action,
                env_name,
                stages,
                commands,
                dry_run,
            } => {
                debug!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    action = %action,
                    env_name = %env_name,
                    stages = stages,
                    commands = commands,
                    dry_run = dry_run,
                    "Plan ready"
                );
            }
            PlanEvent::StageStarted { stage, description } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    stage = %stage,
                    description = %description,
                    "Stage started"
                );
            }
            PlanEvent::StageCompleted { stage } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    stage = %stage,
                    "Stage completed"
                );
            }
            PlanEvent::NothingToDo { stage, description } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    stage = %stage,
                    description = %description,
                    "Nothing to do"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::ActionStarted { action } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    action = %action,
                    "Action started"
                );
            }
            GeneralEvent::ActionFinished { action, success } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    action = %action,
                    success = success,
                    "Action finished"
                );
            }
            GeneralEvent::Progress { message } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    text = %message,
                    "Progress"
                );
            }
            GeneralEvent::Debug { message } => {
                debug!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    text = %message,
                    "Debug"
                );
            }
        },
    }
}
