#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for python-venv
//!
//! All user-visible progress output goes through events: library crates
//! emit them, and the CLI decides how to render and log them. Nothing
//! outside the CLI prints directly.

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{AppEvent, FailureContext, GeneralEvent, PlanEvent, ProcessEvent};

use tokio::sync::mpsc::UnboundedSender;

/// An event together with its metadata
#[derive(Debug, Clone)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    #[must_use]
    pub fn new(meta: EventMeta, event: AppEvent) -> Self {
        Self { meta, event }
    }

    /// Wrap an event with metadata derived from its own level and source.
    #[must_use]
    pub fn from_event(event: AppEvent) -> Self {
        let meta = EventMeta::new(event.log_level(), event.event_source());
        Self { meta, event }
    }
}

/// Type alias for the event sender
pub type EventSender = UnboundedSender<EventMessage>;

/// Type alias for the event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<EventMessage>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events
///
/// Implemented by the raw `EventSender` and by any context struct that
/// carries one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Correlation id stamped on every event this emitter sends
    fn correlation_id(&self) -> Option<&str> {
        None
    }

    /// Emit an event with explicit metadata
    fn emit_with_meta(&self, meta: EventMeta, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(EventMessage::new(meta, event));
        }
    }

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        let mut meta = EventMeta::new(event.log_level(), event.event_source());
        if let Some(correlation) = self.correlation_id() {
            meta = meta.with_correlation_id(correlation);
        }
        self.emit_with_meta(meta, event);
    }

    /// Emit a progress line
    fn emit_progress(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::progress(message)));
    }

    /// Emit a debug log event
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::debug(message)));
    }

    fn emit_action_started(&self, action: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::ActionStarted {
            action: action.into(),
        }));
    }

    fn emit_action_finished(&self, action: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::ActionFinished {
            action: action.into(),
            success,
        }));
    }

    /// Emit a command trace line
    fn emit_trace(&self, command: impl Into<String>) {
        self.emit(AppEvent::Process(ProcessEvent::Trace {
            command: command.into(),
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sender_delivers_events_in_order() {
        let (tx, mut rx) = channel();
        tx.emit_progress("Creating Python venv at .venv");
        tx.emit_trace("python3 -m venv .venv");

        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first.event,
            AppEvent::General(GeneralEvent::Progress { ref message }) if message == "Creating Python venv at .venv"
        ));
        assert_eq!(first.meta.source, EventSource::General);

        let second = rx.recv().await.unwrap();
        assert!(matches!(second.event, AppEvent::Process(ProcessEvent::Trace { .. })));
        assert_eq!(second.meta.level, EventLevel::Info);
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        let (tx, rx) = channel();
        drop(rx);
        tx.emit_progress("nobody is listening");
    }

    #[test]
    fn debug_events_log_at_debug() {
        let event = AppEvent::Process(ProcessEvent::Completed {
            command: "pip install".to_string(),
            exit_code: 0,
            duration_ms: 10,
        });
        assert_eq!(event.log_level(), tracing::Level::DEBUG);
        let message = EventMessage::from_event(event);
        assert_eq!(message.meta.level, EventLevel::Debug);
        assert_eq!(message.meta.source, EventSource::Process);
    }
}
