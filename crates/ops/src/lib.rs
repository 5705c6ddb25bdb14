#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations orchestration for python-venv
//!
//! This crate serves as the orchestration layer between the CLI and the
//! backend crates. Each action is planned completely first and then either
//! printed (dry run) or executed step by step.

mod context;
mod executor;
mod plan;
mod planner;
mod request;

pub use context::{OpsContextBuilder, OpsCtx};
pub use executor::execute;
pub use plan::{CommandPlan, PlanStep, Stage, StageKind};
pub use planner::plan;
pub use request::EnvRequest;

use pyvenv_errors::Error;
use pyvenv_events::EventEmitter;
use pyvenv_types::Action;
use serde::Serialize;

/// Summary of one planned or executed action
#[derive(Clone, Debug, Serialize)]
pub struct EnvReport {
    pub action: String,
    pub env_name: String,
    /// Commands in plan order, as traced
    pub commands: Vec<String>,
    pub duration_ms: u64,
}

/// Operation result handed back to the CLI for final output
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum OperationResult {
    /// The plan was printed, nothing ran
    DryRun(EnvReport),
    /// Every step ran successfully
    Completed(EnvReport),
}

impl OperationResult {
    #[must_use]
    pub fn report(&self) -> &EnvReport {
        match self {
            Self::DryRun(report) | Self::Completed(report) => report,
        }
    }
}

async fn run(ctx: &OpsCtx, action: Action, request: &EnvRequest) -> Result<OperationResult, Error> {
    ctx.emit_action_started(action.as_str());
    let result = match plan(ctx, action, request).await {
        Ok(plan) => execute(ctx, &plan).await,
        Err(e) => Err(e),
    };
    ctx.emit_action_finished(action.as_str(), result.is_ok());
    result
}

/// Create an environment and install the requested requirements
///
/// # Errors
///
/// See [`plan`] and [`execute`].
pub async fn create(ctx: &OpsCtx, request: &EnvRequest) -> Result<OperationResult, Error> {
    run(ctx, Action::Create, request).await
}

/// Remove an environment; a missing one is not an error
///
/// # Errors
///
/// See [`plan`] and [`execute`].
pub async fn remove(ctx: &OpsCtx, request: &EnvRequest) -> Result<OperationResult, Error> {
    run(ctx, Action::Remove, request).await
}

/// Remove an environment if present, then create it again
///
/// # Errors
///
/// See [`plan`] and [`execute`].
pub async fn replace(ctx: &OpsCtx, request: &EnvRequest) -> Result<OperationResult, Error> {
    run(ctx, Action::Replace, request).await
}
