//! Command plans
//!
//! A plan is built completely before anything runs, so a dry run prints
//! exactly what a real run would execute.

use pyvenv_platform::PlatformCommand;
use pyvenv_types::Action;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Remove,
    Create,
}

impl StageKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remove => "remove",
            Self::Create => "create",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStep {
    /// A progress line
    Progress(String),
    /// The stage found nothing to do
    Notice(String),
    /// Run an external command
    Run(PlatformCommand),
    /// Delete a directory tree
    RemoveTree(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub kind: StageKind,
    pub description: String,
    pub steps: Vec<PlanStep>,
}

impl Stage {
    #[must_use]
    pub fn new(kind: StageKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            steps: Vec::new(),
        }
    }

    /// Append a progress line; an ellipsis is added unless the message
    /// already ends a sentence.
    pub fn progress(&mut self, message: impl Into<String>) {
        let mut message = message.into();
        if !message.ends_with('.') {
            message.push_str("...");
        }
        self.steps.push(PlanStep::Progress(message));
    }

    /// Append a progress line verbatim.
    pub fn message(&mut self, message: impl Into<String>) {
        self.steps.push(PlanStep::Progress(message.into()));
    }

    pub fn notice(&mut self, message: impl Into<String>) {
        self.steps.push(PlanStep::Notice(message.into()));
    }

    pub fn run(&mut self, command: PlatformCommand) {
        self.steps.push(PlanStep::Run(command));
    }

    pub fn remove_tree(&mut self, path: PathBuf) {
        self.steps.push(PlanStep::RemoveTree(path));
    }

    pub fn commands(&self) -> impl Iterator<Item = &PlatformCommand> {
        self.steps.iter().filter_map(|step| match step {
            PlanStep::Run(cmd) => Some(cmd),
            _ => None,
        })
    }
}

/// Ordered stages for one action on one environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPlan {
    pub action: Action,
    pub env_name: String,
    pub stages: Vec<Stage>,
}

impl CommandPlan {
    #[must_use]
    pub fn new(action: Action, env_name: impl Into<String>) -> Self {
        Self {
            action,
            env_name: env_name.into(),
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, stage: Stage) {
        self.stages.push(stage);
    }

    /// Every external command, in execution order
    pub fn commands(&self) -> impl Iterator<Item = &PlatformCommand> {
        self.stages.iter().flat_map(Stage::commands)
    }

    #[must_use]
    pub fn stage_kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(|stage| stage.kind).collect()
    }
}
