//! Encore configuration schema, deserialized from camelCase YAML.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncoreConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Banned users and privileged operators
    #[serde(default)]
    pub access: AccessConfig,

    /// Group → linked channel mapping for the `c`-prefixed commands
    #[serde(default)]
    pub channel_play: ChannelPlayConfig,

    #[serde(default)]
    pub thumbnails: ThumbnailsConfig,

    /// Voice-chat bridge that performs the actual seek
    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub locale: LocaleConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// Telegram / access
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelegramConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessConfig {
    #[serde(default)]
    pub banned_users: Vec<u64>,
    /// Operators allowed to control playback in every chat
    #[serde(default)]
    pub sudoers: Vec<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelPlayConfig {
    #[serde(default)]
    pub links: Vec<ChannelLink>,
}

impl ChannelPlayConfig {
    /// Linked channel for a group, if one is configured.
    pub fn linked_channel(&self, group_id: i64) -> Option<i64> {
        self.links
            .iter()
            .find(|link| link.group == group_id)
            .map(|link| link.channel)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelLink {
    pub group: i64,
    pub channel: i64,
}

// ---------------------------------------------------------------------------
// Thumbnails
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailsConfig {
    #[serde(default = "defaults::cache_dir")]
    pub cache_dir: String,
    /// 1280x720 RGBA player frame composited over the background
    #[serde(default = "defaults::overlay_path")]
    pub overlay_path: String,
    #[serde(default = "defaults::title_font")]
    pub title_font: String,
    #[serde(default = "defaults::body_font")]
    pub body_font: String,
    /// Downloaded instead of the video artwork when that fails
    #[serde(default = "defaults::placeholder_url")]
    pub placeholder_url: String,
    #[serde(default = "defaults::watermark")]
    pub watermark: String,
    /// Invidious-compatible API base URL
    #[serde(default = "defaults::metadata_base_url")]
    pub metadata_base_url: String,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            cache_dir: defaults::cache_dir(),
            overlay_path: defaults::overlay_path(),
            title_font: defaults::title_font(),
            body_font: defaults::body_font(),
            placeholder_url: defaults::placeholder_url(),
            watermark: defaults::watermark(),
            metadata_base_url: defaults::metadata_base_url(),
        }
    }
}

// ---------------------------------------------------------------------------
// Transport / resolver / locale / logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportConfig {
    #[serde(default = "defaults::seek_endpoint")]
    pub seek_endpoint: String,
    /// Address the playback-state ingress listens on. The streaming side
    /// registers and clears now-playing records there.
    #[serde(default = "defaults::ingress_addr")]
    pub ingress_addr: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            seek_endpoint: defaults::seek_endpoint(),
            ingress_addr: defaults::ingress_addr(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverConfig {
    #[serde(default = "defaults::yt_dlp_path")]
    pub yt_dlp_path: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { yt_dlp_path: defaults::yt_dlp_path() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleConfig {
    /// YAML file overriding individual reply templates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
    #[serde(default)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_yaml() {
        let yaml = r#"
telegram:
  botToken: "123:abc"
access:
  bannedUsers: [1, 2]
  sudoers: [42]
channelPlay:
  links:
    - group: -1001
      channel: -2002
thumbnails:
  watermark: "@MyBot"
"#;
        let config: EncoreConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.access.banned_users, vec![1, 2]);
        assert_eq!(config.channel_play.linked_channel(-1001), Some(-2002));
        assert_eq!(config.channel_play.linked_channel(-1), None);
        assert_eq!(config.thumbnails.watermark, "@MyBot");
        assert_eq!(config.thumbnails.cache_dir, defaults::cache_dir());
    }
}
