//! Video metadata from an Invidious-compatible API.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use encore_core::{MetadataSearch, VideoMetadata};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::text::strip_query;

/// Preferred artwork variants, best first.
const THUMBNAIL_PREFERENCE: &[&str] = &["maxresdefault", "sddefault", "high"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResponse {
    title: Option<String>,
    #[serde(default)]
    length_seconds: u64,
    view_count: Option<u64>,
    author: Option<String>,
    #[serde(default)]
    video_thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    quality: String,
    url: String,
}

pub struct InvidiousSearch {
    client: Client,
    base_url: String,
}

impl InvidiousSearch {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(15)).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn build_metadata(&self, video_id: &str, resp: VideoResponse) -> VideoMetadata {
        let thumbnail = pick_thumbnail(&resp.video_thumbnails)
            .map(|url| self.absolute(url))
            .unwrap_or_else(|| format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg"));

        VideoMetadata {
            title: resp.title.filter(|t| !t.trim().is_empty()),
            duration: format_length(resp.length_seconds),
            thumbnail_url: strip_query(&thumbnail).to_string(),
            views: resp.view_count.map(short_views),
            channel: resp.author.filter(|a| !a.trim().is_empty()),
        }
    }

    fn absolute(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else if let Some(rest) = url.strip_prefix("//") {
            format!("https://{rest}")
        } else {
            format!("{}/{}", self.base_url, url.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl MetadataSearch for InvidiousSearch {
    async fn search(&self, video_id: &str) -> Result<VideoMetadata> {
        let url = format!("{}/api/v1/videos/{}", self.base_url, video_id);
        debug!(%url, "Fetching video metadata");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("metadata request for {video_id} failed"))?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("metadata lookup for {video_id} returned {status}");
        }
        let body: VideoResponse = resp
            .json()
            .await
            .with_context(|| format!("malformed metadata for {video_id}"))?;

        Ok(self.build_metadata(video_id, body))
    }
}

fn pick_thumbnail(thumbnails: &[Thumbnail]) -> Option<&str> {
    THUMBNAIL_PREFERENCE
        .iter()
        .find_map(|q| thumbnails.iter().find(|t| t.quality == *q))
        .or_else(|| thumbnails.first())
        .map(|t| t.url.as_str())
}

/// `M:SS` or `H:MM:SS`. Zero means unknown (live streams report 0).
pub fn format_length(seconds: u64) -> Option<String> {
    if seconds == 0 {
        return None;
    }
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    Some(if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    })
}

/// Compact view count, e.g. `1.2M views`.
pub fn short_views(count: u64) -> String {
    let compact = match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => scaled(count, 1_000, "K"),
        1_000_000..=999_999_999 => scaled(count, 1_000_000, "M"),
        _ => scaled(count, 1_000_000_000, "B"),
    };
    format!("{compact} views")
}

fn scaled(count: u64, unit: u64, suffix: &str) -> String {
    let tenths = count * 10 / unit;
    if tenths % 10 == 0 || tenths >= 1000 {
        format!("{}{suffix}", tenths / 10)
    } else {
        format!("{}.{}{suffix}", tenths / 10, tenths % 10)
    }
}
