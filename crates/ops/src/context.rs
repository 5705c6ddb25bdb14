//! Operations context for dependency injection

use pyvenv_config::Config;
use pyvenv_errors::{Error, OpsError};
use pyvenv_events::{EventEmitter, EventSender};
use pyvenv_platform::{EnvMap, Platform, PlatformContext};
use std::path::PathBuf;

/// Operations context providing access to everything an action needs
pub struct OpsCtx {
    /// Process and filesystem access
    pub platform: Platform,
    /// Event sender for progress reporting
    pub tx: EventSender,
    /// Effective configuration (file, environment and CLI merged)
    pub config: Config,
    /// Absolute directory of the Python project being worked on
    pub project_dir: PathBuf,
    /// Print the plan instead of running it
    pub dry_run: bool,
    base_env: Option<EnvMap>,
    correlation_id: String,
}

impl OpsCtx {
    // No public constructor - use OpsContextBuilder instead

    /// Platform context for spawning commands on behalf of this operation.
    #[must_use]
    pub fn platform_context(&self) -> PlatformContext {
        let ctx = self.platform.create_context(Some(self.tx.clone()));
        match &self.base_env {
            Some(env) => ctx.with_base_env(env.clone()),
            None => ctx,
        }
    }
}

impl EventEmitter for OpsCtx {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(&self.tx)
    }

    fn correlation_id(&self) -> Option<&str> {
        Some(&self.correlation_id)
    }
}

/// Builder for operations context
#[derive(Default)]
pub struct OpsContextBuilder {
    platform: Option<Platform>,
    tx: Option<EventSender>,
    config: Option<Config>,
    project_dir: Option<PathBuf>,
    dry_run: bool,
    base_env: Option<EnvMap>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set platform
    #[must_use]
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Set event sender
    #[must_use]
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the project directory; must be absolute
    #[must_use]
    pub fn with_project_dir(mut self, project_dir: impl Into<PathBuf>) -> Self {
        self.project_dir = Some(project_dir.into());
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Environment every spawned command starts from, replacing the
    /// inherited one
    #[must_use]
    pub fn with_base_env(mut self, env: EnvMap) -> Self {
        self.base_env = Some(env);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if any required component is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let platform = self.platform.ok_or_else(|| OpsError::MissingComponent {
            component: "platform".to_string(),
        })?;

        let tx = self.tx.ok_or_else(|| OpsError::MissingComponent {
            component: "event_sender".to_string(),
        })?;

        let config = self.config.ok_or_else(|| OpsError::MissingComponent {
            component: "config".to_string(),
        })?;

        let project_dir = self.project_dir.ok_or_else(|| OpsError::MissingComponent {
            component: "project_dir".to_string(),
        })?;

        Ok(OpsCtx {
            platform,
            tx,
            config,
            project_dir,
            dry_run: self.dry_run,
            base_env: self.base_env,
            correlation_id: uuid::Uuid::new_v4().to_string(),
        })
    }
}
