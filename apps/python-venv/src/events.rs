//! Event handling and progress display

use console::{Style, Term};
use pyvenv_config::constants::{DEFAULT_TRACE_PREFIX, DRY_RUN_PREFIX, MESSAGE_PREFIX};
use pyvenv_events::{AppEvent, EventMessage, GeneralEvent, ProcessEvent};

/// Renders progress lines and command traces to stderr
pub struct EventHandler {
    term: Term,
    dry_run: bool,
    debug: bool,
    trace_prefix: String,
    progress_style: Style,
    trace_style: Style,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(colors_enabled: bool, debug: bool) -> Self {
        Self {
            term: Term::stderr(),
            dry_run: false,
            debug,
            trace_prefix: DEFAULT_TRACE_PREFIX.to_string(),
            progress_style: Style::new().bold().force_styling(colors_enabled),
            trace_style: Style::new().dim().force_styling(colors_enabled),
        }
    }

    /// Prefix every line with the dry-run marker
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Prefix for command traces, `PS4` in shells
    #[must_use]
    pub fn with_trace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.trace_prefix = prefix.into();
        self
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        if self.debug {
            crate::logging::log_event_with_tracing(&message);
        }

        match message.event {
            AppEvent::General(GeneralEvent::Progress { message }) => {
                let line = self.progress_line(&message);
                self.show(&line);
            }
            AppEvent::Process(ProcessEvent::Trace { command }) => {
                let line = self.trace_line(&command);
                self.show(&line);
            }
            // Everything else is only of interest to the debug log
            _ => {}
        }
    }

    fn marker(&self) -> &'static str {
        if self.dry_run {
            DRY_RUN_PREFIX
        } else {
            ""
        }
    }

    fn progress_line(&self, message: &str) -> String {
        format!(
            "{}{}{message}",
            self.marker(),
            self.progress_style.apply_to(MESSAGE_PREFIX)
        )
    }

    fn trace_line(&self, command: &str) -> String {
        format!(
            "{}{}",
            self.marker(),
            self.trace_style
                .apply_to(format!("{}{command}", self.trace_prefix))
        )
    }

    fn show(&self, line: &str) {
        // stderr going away is not worth failing the run over
        self.term.write_line(line).unwrap_or(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> EventHandler {
        EventHandler::new(false, false)
    }

    #[test]
    fn progress_lines_use_message_prefix() {
        let handler = plain();
        assert_eq!(
            handler.progress_line("Creating Python venv at .venv..."),
            "==> Creating Python venv at .venv..."
        );
    }

    #[test]
    fn dry_run_marks_every_line() {
        let handler = plain().with_dry_run(true);
        assert_eq!(
            handler.progress_line("Done."),
            "[DRY-RUN] ==> Done."
        );
        assert_eq!(
            handler.trace_line("python3 -m venv .venv"),
            "[DRY-RUN] + python3 -m venv .venv"
        );
    }

    #[test]
    fn trace_prefix_is_configurable() {
        let handler = plain().with_trace_prefix(">> ");
        assert_eq!(handler.trace_line("pyenv prefix foo"), ">> pyenv prefix foo");
    }

    #[test]
    fn unrendered_events_are_ignored() {
        let mut handler = plain();
        handler.handle_event(EventMessage::from_event(AppEvent::General(
            GeneralEvent::ActionStarted {
                action: "create".to_string(),
            },
        )));
    }
}
