//! Core platform abstractions and context management

use pyvenv_events::{EventEmitter, EventSender};
use std::sync::Arc;

use crate::environment::EnvMap;

use crate::filesystem::FilesystemOperations;
use crate::process::ProcessOperations;

/// Context for platform operations, providing event emission and the base
/// environment handed to child processes
#[derive(Clone, Default)]
pub struct PlatformContext {
    event_sender: Option<EventSender>,
    base_env: Option<EnvMap>,
}

impl PlatformContext {
    /// Create a new platform context with event emission capabilities
    #[must_use]
    pub fn new(event_sender: Option<EventSender>) -> Self {
        Self {
            event_sender,
            base_env: None,
        }
    }

    /// Replace the inherited environment of every spawned command with `env`
    #[must_use]
    pub fn with_base_env(mut self, env: EnvMap) -> Self {
        self.base_env = Some(env);
        self
    }

    /// Environment children start from, if it replaces the inherited one
    #[must_use]
    pub fn base_env(&self) -> Option<&EnvMap> {
        self.base_env.as_ref()
    }
}

impl EventEmitter for PlatformContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

/// Main platform abstraction providing access to all platform operations
#[derive(Clone)]
pub struct Platform {
    filesystem_ops: Arc<dyn FilesystemOperations>,
    process_ops: Arc<dyn ProcessOperations>,
}

impl Platform {
    /// Create a new platform instance with the specified implementations
    pub fn new(
        filesystem_ops: Arc<dyn FilesystemOperations>,
        process_ops: Arc<dyn ProcessOperations>,
    ) -> Self {
        Self {
            filesystem_ops,
            process_ops,
        }
    }

    /// The platform backed by the real filesystem and `tokio::process`
    #[must_use]
    pub fn current() -> Self {
        use crate::implementations::system::{
            filesystem::SystemFilesystemOperations, process::SystemProcessOperations,
        };

        Self::new(
            Arc::new(SystemFilesystemOperations::new()),
            Arc::new(SystemProcessOperations::new()),
        )
    }

    /// Keep the real filesystem but swap in another process implementation
    #[must_use]
    pub fn with_process(process_ops: Arc<dyn ProcessOperations>) -> Self {
        use crate::implementations::system::filesystem::SystemFilesystemOperations;

        Self::new(Arc::new(SystemFilesystemOperations::new()), process_ops)
    }

    /// Access filesystem operations
    pub fn filesystem(&self) -> &dyn FilesystemOperations {
        &*self.filesystem_ops
    }

    /// Access process operations
    pub fn process(&self) -> &dyn ProcessOperations {
        &*self.process_ops
    }

    /// Create a platform context with event emission
    #[must_use]
    pub fn create_context(&self, event_sender: Option<EventSender>) -> PlatformContext {
        PlatformContext::new(event_sender)
    }
}
