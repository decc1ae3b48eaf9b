use std::fmt;

use serde::{Deserialize, Serialize};

/// Telegram chat identifier (groups and channels are negative).
pub type ChatId = i64;

/// Telegram user identifier.
pub type UserId = u64;

// ---------------------------------------------------------------------------
// Stream descriptors
// ---------------------------------------------------------------------------

/// Transport used for the voice-chat stream, passed through to the seek primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Audio,
    Video,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Audio => write!(f, "audio"),
            StreamKind::Video => write!(f, "video"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeekDirection {
    Forward,
    Backward,
}

impl SeekDirection {
    /// Derive the direction from a command name: `seekback`/`cseekback` go
    /// backward, everything else forward.
    pub fn from_command(name: &str) -> Self {
        if name.ends_with("back") {
            SeekDirection::Backward
        } else {
            SeekDirection::Forward
        }
    }
}

impl fmt::Display for SeekDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeekDirection::Forward => write!(f, "forward"),
            SeekDirection::Backward => write!(f, "backward"),
        }
    }
}

// ---------------------------------------------------------------------------
// Media source
// ---------------------------------------------------------------------------

/// How a [`MediaSource`] must be treated before it can be handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A `vid_` marker: the direct stream URL has to be resolved again.
    Video,
    /// An `index_` entry: the transport wants the raw video id instead.
    Indexed,
    /// A path or URL the transport can use as-is.
    Direct,
}

/// Opaque reference to the media currently streaming in a chat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaSource(String);

impl MediaSource {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn kind(&self) -> SourceKind {
        if self.0.contains("vid_") {
            SourceKind::Video
        } else if self.0.contains("index_") {
            SourceKind::Indexed
        } else {
            SourceKind::Direct
        }
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MediaSource {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ---------------------------------------------------------------------------
// Playback state
// ---------------------------------------------------------------------------

/// The "now playing" record for one chat.
///
/// Created and removed by the playback lifecycle; seek operations only ever
/// adjust `played_seconds`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub chat_id: ChatId,
    /// Zero means the length is unknown (live streams) and seeking is refused.
    pub total_duration_seconds: u64,
    pub played_seconds: u64,
    /// Human-readable duration, e.g. `"04:05"`.
    pub duration_label: String,
    pub source: MediaSource,
    /// Raw video id, used for re-resolution and for indexed sources.
    pub video_id: String,
    /// Alternate source used while the stream plays at a non-1x speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_path: Option<MediaSource>,
    pub stream_kind: StreamKind,
}

impl PlaybackState {
    pub fn is_seekable(&self) -> bool {
        self.total_duration_seconds != 0
    }
}

/// Everything the transport needs to reposition a stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeekTarget {
    pub chat_id: ChatId,
    pub source: MediaSource,
    pub position_seconds: u64,
    /// `position_seconds` rendered with [`crate::seconds_to_min`].
    pub position_label: String,
    pub duration_label: String,
    pub stream_kind: StreamKind,
}

// ---------------------------------------------------------------------------
// Thumbnail inputs
// ---------------------------------------------------------------------------

/// Video details returned by a metadata search. Absent fields fall back to
/// placeholder text when rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub duration: Option<String>,
    pub thumbnail_url: String,
    pub views: Option<String>,
    pub channel: Option<String>,
}

/// Raw HTTP download result.
#[derive(Debug, Clone)]
pub struct FetchedBlob {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl FetchedBlob {
    /// Only a plain 200 counts as a usable download.
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_follows_command_suffix() {
        assert_eq!(SeekDirection::from_command("seek"), SeekDirection::Forward);
        assert_eq!(SeekDirection::from_command("cseek"), SeekDirection::Forward);
        assert_eq!(SeekDirection::from_command("seekback"), SeekDirection::Backward);
        assert_eq!(SeekDirection::from_command("cseekback"), SeekDirection::Backward);
    }

    #[test]
    fn source_kind_detection() {
        assert_eq!(MediaSource::new("downloads/vid_abc.mp4").kind(), SourceKind::Video);
        assert_eq!(MediaSource::new("index_https://x/live.m3u8").kind(), SourceKind::Indexed);
        assert_eq!(MediaSource::new("downloads/abc.webm").kind(), SourceKind::Direct);
    }

    #[test]
    fn only_200_is_success() {
        let ok = FetchedBlob { status: 200, bytes: vec![] };
        let redirect = FetchedBlob { status: 302, bytes: vec![] };
        let created = FetchedBlob { status: 201, bytes: vec![] };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
        assert!(!created.is_success());
    }

    #[test]
    fn zero_duration_is_not_seekable() {
        let state = PlaybackState {
            chat_id: -100,
            total_duration_seconds: 0,
            played_seconds: 0,
            duration_label: "Live".into(),
            source: "index_live".into(),
            video_id: "abc".into(),
            speed_path: None,
            stream_kind: StreamKind::Audio,
        };
        assert!(!state.is_seekable());
    }
}
