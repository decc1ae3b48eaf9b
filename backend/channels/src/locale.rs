//! Reply templates.
//!
//! Templates are addressed by key. The built-in English set can be overridden
//! key by key from a flat YAML map; `{0}`, `{1}`, ... are positional slots.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

const ENGLISH: &[(&str, &str)] = &[
    ("seek_missing_argument", "Give the number of seconds to seek.\n\nExample: /seek 30"),
    ("seek_invalid_argument", "The seek duration must be a whole number of seconds."),
    ("seek_not_streaming", "Nothing is streaming in this chat."),
    ("seek_not_seekable", "This stream can't be seeked. It is live or has no known duration."),
    ("seek_source_unavailable", "The video source is not available right now. Try again later."),
    ("seek_too_close", "Can't seek that far.\n\nPlayed {0} of {1}."),
    ("seek_in_progress", "Seeking..."),
    ("seek_done", "Stream seeked to {0}.\n\nBy: {1}"),
    ("seek_failed", "Failed to seek the stream."),
    ("seek_no_call", "The bot is not in the voice chat."),
    ("channel_play_not_set", "Channel play is not configured for this group."),
    ("button_close", "Close"),
    ("button_back_20", "« 20s"),
    ("button_forward_20", "20s »"),
    ("quick_banned", "You're banned from using this bot!"),
    ("quick_no_privilege", "You don't have permission to manage video chats.\n\nReload the admin cache via: /reload"),
    ("quick_not_streaming", "Bot is not streaming in the voice chat!"),
    ("quick_too_close_end", "Too close to the end.\n\nPlayed: {0} / {1}"),
    ("quick_too_close_start", "Too close to the start.\n\nPlayed: {0} / {1}"),
    ("quick_video_unavailable", "Video not available!"),
    ("quick_forward_done", "Stream seeked forward by {0} secs!\n\nPlayed: {1} / {2}"),
    ("quick_backward_done", "Stream seeked back by {0} secs!\n\nPlayed: {1} / {2}"),
    ("quick_forward_failed", "Failed to seek forward!"),
    ("quick_backward_failed", "Failed to seek backward!"),
];

#[derive(Debug, Clone)]
pub struct Locale {
    templates: HashMap<String, String>,
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl Locale {
    pub fn english() -> Self {
        Self {
            templates: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// English templates, with any keys from `path` replacing the built-ins.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut locale = Self::english();
        let Some(path) = path else {
            return Ok(locale);
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read locale file {}", path.display()))?;
        let overrides: HashMap<String, String> = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse locale file {}", path.display()))?;

        for (key, value) in overrides {
            if !locale.templates.contains_key(&key) {
                warn!(key = %key, "Locale override for unknown key");
            }
            locale.templates.insert(key, value);
        }
        debug!(path = %path.display(), "Loaded locale overrides");
        Ok(locale)
    }

    /// The raw template, or the key itself when nothing is registered.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        self.templates.get(key).map(String::as_str).unwrap_or(key)
    }

    pub fn format(&self, key: &str, args: &[&str]) -> String {
        let mut out = self.get(key).to_string();
        for (i, arg) in args.iter().enumerate() {
            out = out.replace(&format!("{{{i}}}"), arg);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn formats_positional_slots() {
        let locale = Locale::english();
        assert_eq!(
            locale.format("seek_too_close", &["02:10", "03:33"]),
            "Can't seek that far.\n\nPlayed 02:10 of 03:33."
        );
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        assert_eq!(Locale::english().get("no_such_key"), "no_such_key");
    }

    #[test]
    fn yaml_overrides_replace_builtins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seek_in_progress: \"Buscando...\"").unwrap();
        writeln!(file, "seek_done: \"Saltado a {{0}} por {{1}}\"").unwrap();

        let locale = Locale::load(Some(file.path())).unwrap();
        assert_eq!(locale.get("seek_in_progress"), "Buscando...");
        assert_eq!(locale.format("seek_done", &["01:00", "Ana"]), "Saltado a 01:00 por Ana");
        // untouched keys keep the English text
        assert_eq!(locale.get("button_close"), "Close");
    }

    #[test]
    fn malformed_override_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "- just\n- a list").unwrap();
        assert!(Locale::load(Some(file.path())).is_err());
    }
}
