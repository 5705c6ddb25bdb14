//! Printing or running a command plan

use pyvenv_errors::{Error, PlatformError};
use pyvenv_events::{AppEvent, EventEmitter, PlanEvent};
use std::time::Instant;
use tracing::info;

use crate::plan::{CommandPlan, PlanStep};
use crate::{EnvReport, OperationResult, OpsCtx};

/// Walk the plan in order.
///
/// Every step is reported through events. In a dry run nothing is spawned
/// or deleted; otherwise commands run attached to the terminal and the first
/// non-zero exit stops the plan.
///
/// # Errors
///
/// Returns [`PlatformError::CommandFailed`] carrying the exit code of the
/// first failing command, or the error of a command that could not start or
/// a directory that could not be removed.
pub async fn execute(ctx: &OpsCtx, plan: &CommandPlan) -> Result<OperationResult, Error> {
    let start = Instant::now();
    let pctx = ctx.platform_context();

    ctx.emit(AppEvent::Plan(PlanEvent::Ready {
        action: plan.action.to_string(),
        env_name: plan.env_name.clone(),
        stages: plan.stages.len(),
        commands: plan.commands().count(),
        dry_run: ctx.dry_run,
    }));

    for stage in &plan.stages {
        info!(stage = %stage.kind, description = %stage.description, "stage started");
        ctx.emit(AppEvent::Plan(PlanEvent::StageStarted {
            stage: stage.kind.to_string(),
            description: stage.description.clone(),
        }));

        for step in &stage.steps {
            match step {
                PlanStep::Progress(message) => ctx.emit_progress(message.clone()),
                PlanStep::Notice(message) => {
                    ctx.emit(AppEvent::Plan(PlanEvent::NothingToDo {
                        stage: stage.kind.to_string(),
                        description: stage.description.clone(),
                    }));
                    ctx.emit_progress(message.clone());
                }
                PlanStep::Run(cmd) => {
                    let rendered = cmd.to_string();
                    ctx.emit_trace(rendered.clone());
                    // Let the trace line reach the terminal before the child writes to it
                    tokio::task::yield_now().await;
                    if ctx.dry_run {
                        continue;
                    }
                    let code = ctx.platform.process().run_attached(&pctx, cmd.clone()).await?;
                    if code != 0 {
                        return Err(PlatformError::CommandFailed {
                            command: rendered,
                            code,
                        }
                        .into());
                    }
                }
                PlanStep::RemoveTree(path) => {
                    if !ctx.dry_run {
                        ctx.platform.filesystem().remove_dir_all(&pctx, path).await?;
                    }
                }
            }
        }

        ctx.emit(AppEvent::Plan(PlanEvent::StageCompleted {
            stage: stage.kind.to_string(),
        }));
    }

    let report = EnvReport {
        action: plan.action.to_string(),
        env_name: plan.env_name.clone(),
        commands: plan.commands().map(ToString::to_string).collect(),
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    };

    Ok(if ctx.dry_run {
        OperationResult::DryRun(report)
    } else {
        OperationResult::Completed(report)
    })
}
