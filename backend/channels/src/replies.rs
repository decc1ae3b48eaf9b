//! Maps seek results to user-facing text.

use encore_core::{seconds_to_min, SeekDirection, SeekError, TransportError};
use encore_playback::SeekOutcome;

use crate::locale::Locale;

/// Text for the persistent command reply. `mention` names who asked.
pub fn command_reply(
    locale: &Locale,
    result: &Result<SeekOutcome, SeekError>,
    mention: &str,
) -> String {
    match result {
        Ok(outcome) => locale.format("seek_done", &[&seconds_to_min(outcome.target_seconds), mention]),
        Err(err) => command_error(locale, err),
    }
}

pub fn command_error(locale: &Locale, err: &SeekError) -> String {
    match err {
        SeekError::InvalidArgument { raw: None } => locale.get("seek_missing_argument").to_string(),
        SeekError::InvalidArgument { raw: Some(_) } => {
            locale.get("seek_invalid_argument").to_string()
        }
        SeekError::NoActiveSession => locale.get("seek_not_streaming").to_string(),
        SeekError::NotSeekable => locale.get("seek_not_seekable").to_string(),
        SeekError::TooCloseToBoundary {
            played,
            duration_label,
            ..
        } => locale.format("seek_too_close", &[&seconds_to_min(*played), duration_label]),
        SeekError::SourceUnavailable => locale.get("seek_source_unavailable").to_string(),
        SeekError::SeekFailed(TransportError::NoActiveCall) => {
            locale.get("seek_no_call").to_string()
        }
        SeekError::SeekFailed(_) => locale.get("seek_failed").to_string(),
    }
}

/// Text for the quick-action alert.
pub fn quick_reply(
    locale: &Locale,
    direction: SeekDirection,
    result: &Result<SeekOutcome, SeekError>,
) -> String {
    let backward = direction == SeekDirection::Backward;
    match result {
        Ok(outcome) => {
            let key = if backward { "quick_backward_done" } else { "quick_forward_done" };
            locale.format(
                key,
                &[
                    &outcome.offset.to_string(),
                    &seconds_to_min(outcome.played_seconds),
                    &seconds_to_min(outcome.total_seconds),
                ],
            )
        }
        Err(SeekError::NoActiveSession | SeekError::NotSeekable) => {
            locale.get("quick_not_streaming").to_string()
        }
        Err(SeekError::TooCloseToBoundary { played, total, .. }) => {
            let key = if backward { "quick_too_close_start" } else { "quick_too_close_end" };
            locale.format(key, &[&seconds_to_min(*played), &seconds_to_min(*total)])
        }
        Err(SeekError::SourceUnavailable) => locale.get("quick_video_unavailable").to_string(),
        Err(SeekError::InvalidArgument { .. } | SeekError::SeekFailed(_)) => {
            let key = if backward { "quick_backward_failed" } else { "quick_forward_failed" };
            locale.get(key).to_string()
        }
    }
}
