//! Playback Event Logger
//!
//! Structured seek and thumbnail events emitted on the `playback_events` target,
//! so they can be filtered into their own NDJSON stream.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum PlaybackEvent {
    SeekApplied {
        direction: String,
        offset: u64,
        target: u64,
        played: u64,
    },
    SeekRejected {
        direction: String,
        reason: String,
    },
    ThumbnailGenerated {
        video_id: String,
        path: String,
    },
    ThumbnailFailed {
        video_id: String,
        error_msg: String,
    },
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub chat_id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub event: PlaybackEvent,
}

pub struct PlaybackEventLogger;

impl PlaybackEventLogger {
    /// Build the log entry, scrubbing free-form text.
    pub fn entry(chat_id: Option<i64>, mut event: PlaybackEvent) -> EventLogEntry {
        match &mut event {
            PlaybackEvent::SeekRejected { reason, .. } => {
                *reason = redact_sensitive_data(reason);
            }
            PlaybackEvent::ThumbnailFailed { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
            PlaybackEvent::SeekApplied { .. } | PlaybackEvent::ThumbnailGenerated { .. } => {}
        }

        EventLogEntry {
            chat_id,
            timestamp: Utc::now(),
            event,
        }
    }

    pub fn log_event(chat_id: Option<i64>, event: PlaybackEvent) {
        let entry = Self::entry(chat_id, event);
        match serde_json::to_string(&entry) {
            Ok(json) => info!(target: "playback_events", event = %json, "Playback event"),
            Err(_) => info!(target: "playback_events", event = ?entry, "Playback event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_messages_are_redacted() {
        let entry = PlaybackEventLogger::entry(
            None,
            PlaybackEvent::ThumbnailFailed {
                video_id: "abc".into(),
                error_msg: "fetch https://api.telegram.org/bot123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw/x".into(),
            },
        );
        let PlaybackEvent::ThumbnailFailed { error_msg, .. } = entry.event else {
            panic!("event kind changed");
        };
        assert!(error_msg.contains("[REDACTED_BOT_TOKEN]"));
    }

    #[test]
    fn serializes_with_type_tag() {
        let entry = PlaybackEventLogger::entry(
            Some(-100),
            PlaybackEvent::SeekApplied {
                direction: "forward".into(),
                offset: 20,
                target: 121,
                played: 120,
            },
        );
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"]["type"], "SeekApplied");
        assert_eq!(json["chat_id"], -100);
    }
}
