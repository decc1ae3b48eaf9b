//! Thumbnail pipeline: metadata, artwork download, render, atomic save.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use encore_config::ThumbnailsConfig;
use encore_core::{BlobFetcher, MetadataSearch};
use encore_logging::{PlaybackEvent, PlaybackEventLogger};
use image::ImageFormat;
use tracing::{debug, info, warn};

use crate::error::ThumbnailError;
use crate::render::{render_card, Fonts};
use crate::text::ThumbnailCard;

#[derive(Debug, Clone)]
pub struct ThumbnailSettings {
    pub cache_dir: PathBuf,
    pub overlay_path: PathBuf,
    pub title_font: PathBuf,
    pub body_font: PathBuf,
    pub placeholder_url: String,
    pub watermark: String,
}

impl From<&ThumbnailsConfig> for ThumbnailSettings {
    fn from(cfg: &ThumbnailsConfig) -> Self {
        Self {
            cache_dir: PathBuf::from(&cfg.cache_dir),
            overlay_path: PathBuf::from(&cfg.overlay_path),
            title_font: PathBuf::from(&cfg.title_font),
            body_font: PathBuf::from(&cfg.body_font),
            placeholder_url: cfg.placeholder_url.clone(),
            watermark: cfg.watermark.clone(),
        }
    }
}

pub struct ThumbnailComposer {
    settings: ThumbnailSettings,
    search: Arc<dyn MetadataSearch>,
    fetcher: Arc<dyn BlobFetcher>,
}

impl ThumbnailComposer {
    pub fn new(
        settings: ThumbnailSettings,
        search: Arc<dyn MetadataSearch>,
        fetcher: Arc<dyn BlobFetcher>,
    ) -> Self {
        Self {
            settings,
            search,
            fetcher,
        }
    }

    /// Final location of the thumbnail for `video_id`. Regeneration overwrites it.
    pub fn artifact_path(&self, video_id: &str) -> PathBuf {
        self.settings.cache_dir.join(format!("{video_id}.png"))
    }

    fn scratch_path(&self, video_id: &str) -> PathBuf {
        self.settings.cache_dir.join(format!("thumb{video_id}.png"))
    }

    /// Build the thumbnail, or `None` if any step fails. Failures are logged,
    /// never returned.
    pub async fn generate(&self, video_id: &str) -> Option<PathBuf> {
        match self.try_generate(video_id).await {
            Ok(path) => {
                info!(video_id, path = %path.display(), "Thumbnail generated");
                PlaybackEventLogger::log_event(
                    None,
                    PlaybackEvent::ThumbnailGenerated {
                        video_id: video_id.to_string(),
                        path: path.display().to_string(),
                    },
                );
                Some(path)
            }
            Err(e) => {
                warn!(video_id, error = %e, "Thumbnail generation failed");
                PlaybackEventLogger::log_event(
                    None,
                    PlaybackEvent::ThumbnailFailed {
                        video_id: video_id.to_string(),
                        error_msg: e.to_string(),
                    },
                );
                None
            }
        }
    }

    pub async fn try_generate(&self, video_id: &str) -> Result<PathBuf, ThumbnailError> {
        let meta = self
            .search
            .search(video_id)
            .await
            .map_err(ThumbnailError::MetadataUnavailable)?;
        let card = ThumbnailCard::from_metadata(&meta);

        tokio::fs::create_dir_all(&self.settings.cache_dir).await?;
        let scratch = self.scratch_path(video_id);
        let result = self.compose(video_id, &meta.thumbnail_url, &scratch, card).await;

        if let Err(e) = tokio::fs::remove_file(&scratch).await {
            debug!(path = %scratch.display(), error = %e, "Scratch artwork not removed");
        }
        result
    }

    async fn compose(
        &self,
        video_id: &str,
        art_url: &str,
        scratch: &Path,
        card: ThumbnailCard,
    ) -> Result<PathBuf, ThumbnailError> {
        self.download_art(art_url, scratch).await?;

        let art_bytes = tokio::fs::read(scratch).await?;
        let template_bytes = tokio::fs::read(&self.settings.overlay_path).await?;
        let title_font = tokio::fs::read(&self.settings.title_font).await?;
        let body_font = tokio::fs::read(&self.settings.body_font).await?;
        let watermark = self.settings.watermark.clone();

        let image = tokio::task::spawn_blocking(move || {
            let art = image::load_from_memory(&art_bytes)?;
            let template = image::load_from_memory(&template_bytes)?;
            let fonts = Fonts::from_bytes(title_font, body_font)?;
            render_card(&art, &template, &fonts, &card, &watermark)
        })
        .await
        .map_err(|e| ThumbnailError::RenderFailed(e.to_string()))??;

        let path = self.artifact_path(video_id);
        let tmp = path.with_extension("png.tmp");
        let tmp_for_save = tmp.clone();
        tokio::task::spawn_blocking(move || image.save_with_format(&tmp_for_save, ImageFormat::Png))
            .await
            .map_err(|e| ThumbnailError::RenderFailed(e.to_string()))??;

        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(path)
    }

    /// Download `url` into `dest`, falling back to the placeholder image.
    /// A body that does not decode as an image counts as a failed download.
    pub(crate) async fn download_art(&self, url: &str, dest: &Path) -> Result<(), ThumbnailError> {
        match self.fetch_image(url).await {
            Ok(bytes) => {
                tokio::fs::write(dest, bytes).await?;
                return Ok(());
            }
            Err(reason) => {
                warn!(url, %reason, "Artwork download failed, using placeholder");
            }
        }

        let bytes = self
            .fetch_image(&self.settings.placeholder_url)
            .await
            .map_err(ThumbnailError::DownloadFailed)?;
        tokio::fs::write(dest, bytes).await?;
        Ok(())
    }

    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, String> {
        let blob = match self.fetcher.fetch(url).await {
            Ok(blob) if blob.is_success() => blob,
            Ok(blob) => return Err(format!("{url} returned status {}", blob.status)),
            Err(e) => return Err(format!("{url}: {e}")),
        };
        image::load_from_memory(&blob.bytes)
            .map_err(|e| format!("{url} is not a decodable image: {e}"))?;
        Ok(blob.bytes)
    }
}
