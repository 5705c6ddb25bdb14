use serde::{Deserialize, Serialize};

/// Events that are not tied to a plan stage or a child process
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneralEvent {
    /// A `==> ` line for the user
    Progress { message: String },

    /// Only shown in the debug log
    Debug { message: String },

    /// An action (create, remove, replace) began
    ActionStarted { action: String },

    /// An action ended, successfully or not
    ActionFinished { action: String, success: bool },
}

impl GeneralEvent {
    pub fn progress(message: impl Into<String>) -> Self {
        Self::Progress {
            message: message.into(),
        }
    }

    pub fn debug(message: impl Into<String>) -> Self {
        Self::Debug {
            message: message.into(),
        }
    }
}
