use serde::{Deserialize, Serialize};

/// Events describing the lifecycle of a command plan
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanEvent {
    /// A plan was built and is about to be printed or executed
    Ready {
        action: String,
        env_name: String,
        stages: usize,
        commands: usize,
        dry_run: bool,
    },

    /// A stage (remove or create) started
    StageStarted { stage: String, description: String },

    /// A stage finished without error
    StageCompleted { stage: String },

    /// The environment a stage targets was found to be absent
    NothingToDo { stage: String, description: String },
}
