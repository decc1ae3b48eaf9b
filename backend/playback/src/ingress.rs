//! Playback-state ingress.
//!
//! The streaming side owns the playback lifecycle. It registers the
//! now-playing record here when a track starts and clears it when the call
//! ends, so seeks always work against the position it last reported.
//!
//! - `PUT /playback/:chat_id` registers or replaces a record (201 or 204)
//! - `GET /playback/:chat_id` returns the current record (200 or 404)
//! - `DELETE /playback/:chat_id` clears it (204 or 404)
//! - `GET /health`

use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use encore_core::{ChatId, PlaybackState};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::store::{PlaybackStore, StoreClosed};

type ApiResult<T> = Result<T, (StatusCode, String)>;

#[derive(Clone)]
pub struct IngressState {
    store: PlaybackStore,
}

pub fn router(store: PlaybackStore) -> Router {
    Router::new()
        .route(
            "/playback/:chat_id",
            get(get_session).put(put_session).delete(delete_session),
        )
        .route("/health", get(|| async { "OK" }))
        .with_state(IngressState { store })
}

/// Serve the ingress until the listener fails.
#[instrument(skip(store))]
pub async fn serve_ingress(addr: SocketAddr, store: PlaybackStore) -> Result<()> {
    let app = router(store);

    info!("Playback ingress listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn put_session(
    State(state): State<IngressState>,
    Path(chat_id): Path<ChatId>,
    Json(session): Json<PlaybackState>,
) -> ApiResult<StatusCode> {
    if session.chat_id != chat_id {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("body chatId {} does not match path {chat_id}", session.chat_id),
        ));
    }
    if session.played_seconds > session.total_duration_seconds && session.total_duration_seconds > 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "playedSeconds is past totalDurationSeconds".to_string(),
        ));
    }

    let replaced = state.store.insert(session).await.map_err(unavailable)?;
    Ok(if replaced.is_some() {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::CREATED
    })
}

async fn get_session(
    State(state): State<IngressState>,
    Path(chat_id): Path<ChatId>,
) -> ApiResult<Json<PlaybackState>> {
    state
        .store
        .get(chat_id)
        .await
        .map_err(unavailable)?
        .map(Json)
        .ok_or_else(|| not_playing(chat_id))
}

async fn delete_session(
    State(state): State<IngressState>,
    Path(chat_id): Path<ChatId>,
) -> ApiResult<StatusCode> {
    match state.store.remove(chat_id).await.map_err(unavailable)? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(not_playing(chat_id)),
    }
}

fn not_playing(chat_id: ChatId) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("nothing is playing in {chat_id}"))
}

fn unavailable(e: StoreClosed) -> (StatusCode, String) {
    (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
}
