//! Structured logging for Encore.
//!
//! Console + rolling NDJSON file output, secret redaction, and playback event records.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{EventLogEntry, PlaybackEvent, PlaybackEventLogger};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
