use std::sync::Arc;

use encore_core::{
    seconds_to_min, ChatId, MediaSource, PlaybackState, SeekDirection, SeekError, SeekTarget,
    SourceKind, StreamSeeker, VideoResolver,
};
use encore_logging::{PlaybackEvent, PlaybackEventLogger};
use tracing::{error, info, warn};

use crate::store::PlaybackStore;

/// A seek may not leave less than this much room to either end of the track.
pub const BOUNDARY_FLOOR_SECONDS: u64 = 10;

/// Offset used by the inline quick-action buttons.
pub const QUICK_SEEK_SECONDS: u64 = 20;

/// A validated seek, ready to be handed to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekPlan {
    pub direction: SeekDirection,
    pub offset: u64,
    /// Position the stream should end up at.
    pub candidate: u64,
    /// What the transport is asked for: one second past `candidate`.
    pub target: u64,
}

/// Result of a successful seek.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekOutcome {
    pub chat_id: ChatId,
    pub direction: SeekDirection,
    pub offset: u64,
    pub target_seconds: u64,
    /// Stored position after the seek.
    pub played_seconds: u64,
    pub total_seconds: u64,
    pub duration_label: String,
}

/// Parse a user-supplied offset. Only plain non-negative integers are accepted.
pub fn parse_offset(raw: Option<&str>) -> Result<u64, SeekError> {
    let trimmed = raw.map(str::trim).filter(|s| !s.is_empty());
    let Some(text) = trimmed else {
        return Err(SeekError::InvalidArgument { raw: None });
    };
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(SeekError::InvalidArgument { raw: Some(text.to_string()) });
    }
    text.parse()
        .map_err(|_| SeekError::InvalidArgument { raw: Some(text.to_string()) })
}

/// Check a seek against the current position and duration.
pub fn plan_seek(
    state: &PlaybackState,
    offset: u64,
    direction: SeekDirection,
) -> Result<SeekPlan, SeekError> {
    if !state.is_seekable() {
        return Err(SeekError::NotSeekable);
    }

    let played = i128::from(state.played_seconds);
    let total = i128::from(state.total_duration_seconds);
    let shift = i128::from(offset);
    let floor = i128::from(BOUNDARY_FLOOR_SECONDS);

    let candidate = match direction {
        SeekDirection::Backward => played - shift,
        SeekDirection::Forward => played + shift,
    };
    let room = match direction {
        SeekDirection::Backward => candidate,
        SeekDirection::Forward => total - candidate,
    };
    if room <= floor {
        return Err(SeekError::TooCloseToBoundary {
            direction,
            played: state.played_seconds,
            total: state.total_duration_seconds,
            duration_label: state.duration_label.clone(),
        });
    }

    // room > floor >= 0 guarantees candidate is positive and, going forward,
    // below total; both fit in u64.
    let candidate = candidate as u64;
    Ok(SeekPlan {
        direction,
        offset,
        candidate,
        target: candidate + 1,
    })
}

/// Runs a seek end to end: validation, source resolution, the transport call,
/// and the stored position update.
pub struct SeekController {
    store: PlaybackStore,
    seeker: Arc<dyn StreamSeeker>,
    resolver: Arc<dyn VideoResolver>,
}

impl SeekController {
    pub fn new(
        store: PlaybackStore,
        seeker: Arc<dyn StreamSeeker>,
        resolver: Arc<dyn VideoResolver>,
    ) -> Self {
        Self { store, seeker, resolver }
    }

    pub fn store(&self) -> &PlaybackStore {
        &self.store
    }

    pub async fn seek(
        &self,
        chat_id: ChatId,
        raw_offset: Option<&str>,
        direction: SeekDirection,
    ) -> Result<SeekOutcome, SeekError> {
        let result = self.run(chat_id, raw_offset, direction).await;
        match &result {
            Ok(outcome) => PlaybackEventLogger::log_event(
                Some(chat_id),
                PlaybackEvent::SeekApplied {
                    direction: direction.to_string(),
                    offset: outcome.offset,
                    target: outcome.target_seconds,
                    played: outcome.played_seconds,
                },
            ),
            Err(err) => PlaybackEventLogger::log_event(
                Some(chat_id),
                PlaybackEvent::SeekRejected {
                    direction: direction.to_string(),
                    reason: err.to_string(),
                },
            ),
        }
        result
    }

    async fn run(
        &self,
        chat_id: ChatId,
        raw_offset: Option<&str>,
        direction: SeekDirection,
    ) -> Result<SeekOutcome, SeekError> {
        let offset = parse_offset(raw_offset)?;

        let state = match self.store.get(chat_id).await {
            Ok(Some(state)) => state,
            Ok(None) => return Err(SeekError::NoActiveSession),
            Err(e) => {
                error!(chat_id, error = %e, "Playback store unavailable");
                return Err(SeekError::NoActiveSession);
            }
        };

        let plan = plan_seek(&state, offset, direction)?;
        let source = self.resolve_source(&state).await?;

        let target = SeekTarget {
            chat_id,
            source,
            position_seconds: plan.target,
            position_label: seconds_to_min(plan.target),
            duration_label: state.duration_label.clone(),
            stream_kind: state.stream_kind,
        };
        info!(
            chat_id,
            %direction,
            offset,
            target = %target.position_label,
            source = %target.source,
            "Seeking stream"
        );
        self.seeker.seek(&target).await?;

        // The stored position moves by the requested offset; the +1 only
        // applies to the transport.
        let delta = match direction {
            SeekDirection::Forward => offset as i64,
            SeekDirection::Backward => -(offset as i64),
        };
        let played = match self.store.adjust_played(chat_id, delta).await {
            Ok(Some(played)) => played,
            Ok(None) | Err(_) => {
                warn!(chat_id, "Playback session vanished during seek");
                plan.candidate
            }
        };

        Ok(SeekOutcome {
            chat_id,
            direction,
            offset,
            target_seconds: plan.target,
            played_seconds: played,
            total_seconds: state.total_duration_seconds,
            duration_label: state.duration_label,
        })
    }

    /// Pick the reference the transport should seek within.
    async fn resolve_source(&self, state: &PlaybackState) -> Result<MediaSource, SeekError> {
        let mut source = state.source.clone();

        if source.kind() == SourceKind::Video {
            match self.resolver.resolve(&state.video_id, true).await {
                Ok(url) => source = MediaSource::new(url),
                Err(e) => {
                    warn!(chat_id = state.chat_id, video_id = %state.video_id, error = %e, "Video re-resolution failed");
                    return Err(SeekError::SourceUnavailable);
                }
            }
        }

        if let Some(speed_path) = &state.speed_path {
            source = speed_path.clone();
        }

        if source.kind() == SourceKind::Indexed {
            source = MediaSource::new(state.video_id.clone());
        }

        Ok(source)
    }
}
