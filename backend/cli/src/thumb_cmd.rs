//! `encore thumb <video_id>`

use std::sync::Arc;

use anyhow::Result;
use encore_config::EncoreConfig;
use encore_media::{HttpBlobFetcher, InvidiousSearch, ThumbnailComposer, ThumbnailSettings};

pub fn composer(config: &EncoreConfig) -> Result<ThumbnailComposer> {
    let thumbs = &config.thumbnails;
    Ok(ThumbnailComposer::new(
        ThumbnailSettings::from(thumbs),
        Arc::new(InvidiousSearch::new(&thumbs.metadata_base_url)?),
        Arc::new(HttpBlobFetcher::new()?),
    ))
}

pub async fn run(config: &EncoreConfig, video_id: &str) -> Result<()> {
    match composer(config)?.generate(video_id).await {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => anyhow::bail!("no thumbnail could be generated for {video_id}; see the log for details"),
    }
}
