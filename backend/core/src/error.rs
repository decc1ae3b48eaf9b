use thiserror::Error;

use crate::types::SeekDirection;

/// Why a seek request did not move the stream.
///
/// Every variant except `SeekFailed` is raised before the transport is touched,
/// so none of them leave the stored playback position changed.
#[derive(Debug, Error)]
pub enum SeekError {
    /// `raw` is `None` when no argument was given at all.
    #[error("invalid seek argument: {raw:?}")]
    InvalidArgument { raw: Option<String> },

    #[error("nothing is playing in this chat")]
    NoActiveSession,

    #[error("the current stream has no known duration")]
    NotSeekable,

    #[error("seeking {direction} would land within 10s of the boundary (played {played}s of {total}s)")]
    TooCloseToBoundary {
        direction: SeekDirection,
        played: u64,
        total: u64,
        /// The session's own duration label, shown to users as-is.
        duration_label: String,
    },

    #[error("the video source could not be resolved")]
    SourceUnavailable,

    #[error("stream transport failed: {0}")]
    SeekFailed(#[from] TransportError),
}

/// Failure reported by the voice-chat transport when repositioning a stream.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("no active voice chat call")]
    NoActiveCall,

    #[error("transport rejected the seek: {0}")]
    Rejected(String),

    /// Anything the transport could not classify.
    #[error("unknown transport failure: {0}")]
    Unknown(String),
}

/// Failure to turn a video id into a playable reference.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no playable stream for video {0}")]
    NotFound(String),

    #[error("resolver failed: {0}")]
    Backend(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_converts_into_seek_failed() {
        let err: SeekError = TransportError::NoActiveCall.into();
        assert!(matches!(err, SeekError::SeekFailed(TransportError::NoActiveCall)));
    }

    #[test]
    fn boundary_error_mentions_position() {
        let err = SeekError::TooCloseToBoundary {
            direction: SeekDirection::Backward,
            played: 15,
            total: 200,
            duration_label: "03:20".into(),
        };
        let text = err.to_string();
        assert!(text.contains("backward"));
        assert!(text.contains("15s of 200s"));
    }
}
