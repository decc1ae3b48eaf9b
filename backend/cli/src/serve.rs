//! `encore serve`: wires the playback services into the Telegram adapter and
//! exposes the store through the playback ingress.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use encore_channels::{Locale, TelegramAdapter};
use encore_config::EncoreConfig;
use encore_playback::{
    serve_ingress, HttpStreamSeeker, PlaybackStore, SeekController, SeekService, YtDlpResolver,
};
use tracing::{error, info};

pub async fn run(config: EncoreConfig) -> Result<()> {
    let token = config
        .telegram
        .bot_token
        .clone()
        .context("telegram.botToken is not set")?;
    let locale = Locale::load(config.locale.path.as_deref().map(Path::new))?;
    let ingress_addr: SocketAddr = config
        .transport
        .ingress_addr
        .parse()
        .with_context(|| format!("Invalid transport.ingressAddr '{}'", config.transport.ingress_addr))?;

    let store = PlaybackStore::spawn();
    let ingress_store = store.clone();
    tokio::spawn(async move {
        if let Err(e) = serve_ingress(ingress_addr, ingress_store).await {
            error!(error = %e, "Playback ingress stopped");
        }
    });

    let controller = Arc::new(SeekController::new(
        store,
        Arc::new(HttpStreamSeeker::new(&config.transport.seek_endpoint)),
        Arc::new(YtDlpResolver::new(&config.resolver.yt_dlp_path)),
    ));
    let seeks = SeekService::spawn(controller);

    info!(
        seek_endpoint = %config.transport.seek_endpoint,
        %ingress_addr,
        channel_links = config.channel_play.links.len(),
        "Starting Encore"
    );

    TelegramAdapter::new(token).start(seeks, &config, locale).await
}
