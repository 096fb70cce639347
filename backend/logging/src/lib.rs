//! Structured logging for TaskPilot.
//!
//! Handles subscriber setup (console + rolling NDJSON file), secret redaction,
//! and the per-session directive event journal.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{DirectiveEvent, EventLogEntry, EventLogger, EVENT_TARGET};
pub use logger::{init_logger, LogOptions};
pub use redact::redact_sensitive_data;
