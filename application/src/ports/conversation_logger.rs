//! Port for structured transcript logging.
//!
//! Defines the [`ConversationLogger`] trait for recording round events
//! (prompts sent to a model, raw responses, availability verdicts, round
//! summaries) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! transcript in a machine-readable format (JSONL).

use namesmith_domain::SessionId;
use serde_json::Value;

/// A structured transcript event.
///
/// Each event has a type string, an optional owning session, and a JSON
/// payload containing event-specific fields. The writer adds the timestamp.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "llm_prompt", "availability", "round_complete").
    pub event_type: &'static str,
    /// Session the event belongs to, if any.
    pub session: Option<SessionId>,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            session: None,
            payload,
        }
    }

    pub fn for_session(mut self, session: &SessionId) -> Self {
        self.session = Some(session.clone());
        self
    }
}

/// Port for logging transcript events.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// `log` is synchronous and non-fallible; logging failures are ignored.
pub trait ConversationLogger: Send + Sync {
    /// Record a transcript event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
