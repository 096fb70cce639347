//! Directive Event Logger
//!
//! Structured events (dispatched, completed, failed) emitted under a dedicated
//! tracing target so the NDJSON file layer keeps a per-session journal.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

/// Tracing target for directive journal entries.
pub const EVENT_TARGET: &str = "directive_events";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DirectiveEvent {
    Dispatched {
        command: String,
        arguments_json: String,
    },
    Completed {
        command: String,
        output_chars: usize,
    },
    Failed {
        command: String,
        kind: String,
        error_msg: String,
    },
}

impl DirectiveEvent {
    fn redacted(self) -> Self {
        match self {
            Self::Dispatched { command, arguments_json } => Self::Dispatched {
                command,
                arguments_json: redact_sensitive_data(&arguments_json),
            },
            Self::Failed { command, kind, error_msg } => Self::Failed {
                command,
                kind,
                error_msg: redact_sensitive_data(&error_msg),
            },
            completed @ Self::Completed { .. } => completed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: DirectiveEvent,
}

pub struct EventLogger;

impl EventLogger {
    /// Build the redacted journal entry for an event.
    pub fn entry(session_id: &str, event: DirectiveEvent) -> EventLogEntry {
        EventLogEntry {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            event: event.redacted(),
        }
    }

    /// Redact and emit an event to the tracing system.
    pub fn log_event(session_id: &str, event: DirectiveEvent) {
        let entry = Self::entry(session_id, event);
        let payload = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: EVENT_TARGET, session = %entry.session_id, event = %payload, "directive event");
    }
}
