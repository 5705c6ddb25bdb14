use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::FailureContext;

/// Events for external commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProcessEvent {
    /// Shell-style trace of a command that is about to run (or would run)
    Trace { command: String },

    /// A command was spawned
    Started {
        program: String,
        args: Vec<String>,
        cwd: Option<PathBuf>,
    },

    /// A command exited
    Completed {
        command: String,
        exit_code: i32,
        duration_ms: u64,
    },

    /// A command could not be spawned or exited unsuccessfully
    Failed {
        command: String,
        failure: FailureContext,
    },
}
