//! Seek command detection.
//!
//! Recognizes `/seek`, `/seekback`, `/cseek` and `/cseekback`, optionally
//! addressed as `/seek@SomeBot`, and splits off the argument text.

use encore_core::SeekDirection;

const SEEK_ALIASES: &[&str] = &["seek", "seekback", "cseek", "cseekback"];

/// A seek command as typed in chat. The argument is left unparsed so the
/// controller can tell a missing argument from a malformed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekCommand {
    pub name: String,
    pub direction: SeekDirection,
    /// Operate on the group's linked channel instead of the group itself.
    pub channel_mode: bool,
    pub raw_offset: Option<String>,
}

/// Returns `None` for anything that is not a seek command for this bot.
pub fn detect_seek_command(text: &str, bot_username: &str) -> Option<SeekCommand> {
    let trimmed = text.trim();
    let head = trimmed.strip_prefix('/')?;

    let (alias_part, rest) = head
        .split_once(char::is_whitespace)
        .map(|(a, r)| (a, r.trim()))
        .unwrap_or((head, ""));

    let name = match alias_part.split_once('@') {
        Some((name, target)) => {
            if !target.eq_ignore_ascii_case(bot_username) {
                return None;
            }
            name
        }
        None => alias_part,
    };
    let name = name.to_ascii_lowercase();
    if !SEEK_ALIASES.contains(&name.as_str()) {
        return None;
    }

    Some(SeekCommand {
        direction: SeekDirection::from_command(&name),
        channel_mode: name.starts_with('c'),
        raw_offset: (!rest.is_empty()).then(|| rest.to_string()),
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_alias() {
        let cases = [
            ("/seek 30", SeekDirection::Forward, false),
            ("/seekback 30", SeekDirection::Backward, false),
            ("/cseek 30", SeekDirection::Forward, true),
            ("/cseekback 30", SeekDirection::Backward, true),
        ];
        for (text, direction, channel_mode) in cases {
            let cmd = detect_seek_command(text, "EncoreBot").unwrap();
            assert_eq!(cmd.direction, direction, "{text}");
            assert_eq!(cmd.channel_mode, channel_mode, "{text}");
            assert_eq!(cmd.raw_offset.as_deref(), Some("30"));
        }
    }

    #[test]
    fn bot_suffix_must_match() {
        assert!(detect_seek_command("/seek@encorebot 5", "EncoreBot").is_some());
        assert!(detect_seek_command("/seek@OtherBot 5", "EncoreBot").is_none());
    }

    #[test]
    fn missing_argument_is_kept_distinct() {
        let cmd = detect_seek_command("/seekback", "EncoreBot").unwrap();
        assert_eq!(cmd.raw_offset, None);

        let cmd = detect_seek_command("/seek  ten seconds ", "EncoreBot").unwrap();
        assert_eq!(cmd.raw_offset.as_deref(), Some("ten seconds"));
    }

    #[test]
    fn ignores_other_text() {
        assert!(detect_seek_command("seek 30", "EncoreBot").is_none());
        assert!(detect_seek_command("/play song", "EncoreBot").is_none());
        assert!(detect_seek_command("/seeker 30", "EncoreBot").is_none());
        assert!(detect_seek_command("/", "EncoreBot").is_none());
    }
}
