use std::collections::HashMap;

use encore_core::{ChatId, PlaybackState};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

const DEFAULT_BUFFER_SIZE: usize = 256;

#[derive(Debug, Error)]
#[error("playback store is no longer running")]
pub struct StoreClosed;

enum StoreCommand {
    Get {
        chat_id: ChatId,
        respond_to: oneshot::Sender<Option<PlaybackState>>,
    },
    Insert {
        state: PlaybackState,
        respond_to: oneshot::Sender<Option<PlaybackState>>,
    },
    Remove {
        chat_id: ChatId,
        respond_to: oneshot::Sender<Option<PlaybackState>>,
    },
    AdjustPlayed {
        chat_id: ChatId,
        delta: i64,
        respond_to: oneshot::Sender<Option<u64>>,
    },
}

/// Handle to the actor that owns every chat's [`PlaybackState`].
///
/// Commands are processed one at a time in arrival order, so reads and
/// adjustments never interleave. Cloning the handle is cheap; the actor stops
/// when the last handle is dropped.
#[derive(Clone)]
pub struct PlaybackStore {
    tx: mpsc::Sender<StoreCommand>,
}

impl PlaybackStore {
    /// Spawn the store actor on the current runtime.
    pub fn spawn() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    pub fn with_buffer_size(buffer: usize) -> Self {
        let (tx, rx) = mpsc::channel(buffer);
        tokio::spawn(run(rx));
        info!(buffer_size = buffer, "Playback store started");
        Self { tx }
    }

    pub async fn get(&self, chat_id: ChatId) -> Result<Option<PlaybackState>, StoreClosed> {
        self.request(|respond_to| StoreCommand::Get { chat_id, respond_to }).await
    }

    /// Register the now-playing record for a chat, returning the one it replaced.
    pub async fn insert(&self, state: PlaybackState) -> Result<Option<PlaybackState>, StoreClosed> {
        self.request(|respond_to| StoreCommand::Insert { state, respond_to }).await
    }

    pub async fn remove(&self, chat_id: ChatId) -> Result<Option<PlaybackState>, StoreClosed> {
        self.request(|respond_to| StoreCommand::Remove { chat_id, respond_to }).await
    }

    /// Shift `played_seconds` by `delta`, clamping at zero. Returns the new
    /// value, or `None` if the chat has no entry.
    pub async fn adjust_played(&self, chat_id: ChatId, delta: i64) -> Result<Option<u64>, StoreClosed> {
        self.request(|respond_to| StoreCommand::AdjustPlayed { chat_id, delta, respond_to })
            .await
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> StoreCommand,
    ) -> Result<T, StoreClosed> {
        let (respond_to, rx) = oneshot::channel();
        self.tx.send(build(respond_to)).await.map_err(|_| StoreClosed)?;
        rx.await.map_err(|_| StoreClosed)
    }
}

async fn run(mut rx: mpsc::Receiver<StoreCommand>) {
    let mut sessions: HashMap<ChatId, PlaybackState> = HashMap::new();

    while let Some(command) = rx.recv().await {
        match command {
            StoreCommand::Get { chat_id, respond_to } => {
                let _ = respond_to.send(sessions.get(&chat_id).cloned());
            }
            StoreCommand::Insert { state, respond_to } => {
                debug!(chat_id = state.chat_id, source = %state.source, "Playback session registered");
                let _ = respond_to.send(sessions.insert(state.chat_id, state));
            }
            StoreCommand::Remove { chat_id, respond_to } => {
                debug!(chat_id, "Playback session removed");
                let _ = respond_to.send(sessions.remove(&chat_id));
            }
            StoreCommand::AdjustPlayed { chat_id, delta, respond_to } => {
                let updated = sessions.get_mut(&chat_id).map(|state| {
                    state.played_seconds = state.played_seconds.saturating_add_signed(delta);
                    state.played_seconds
                });
                let _ = respond_to.send(updated);
            }
        }
    }

    debug!("Playback store stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_core::StreamKind;

    fn state(chat_id: ChatId, played: u64) -> PlaybackState {
        PlaybackState {
            chat_id,
            total_duration_seconds: 300,
            played_seconds: played,
            duration_label: "05:00".into(),
            source: "downloads/abc.webm".into(),
            video_id: "abc".into(),
            speed_path: None,
            stream_kind: StreamKind::Audio,
        }
    }

    #[tokio::test]
    async fn insert_get_remove() {
        let store = PlaybackStore::spawn();
        assert!(store.get(-1).await.unwrap().is_none());

        assert!(store.insert(state(-1, 10)).await.unwrap().is_none());
        assert_eq!(store.get(-1).await.unwrap().unwrap().played_seconds, 10);

        let replaced = store.insert(state(-1, 50)).await.unwrap().unwrap();
        assert_eq!(replaced.played_seconds, 10);

        assert!(store.remove(-1).await.unwrap().is_some());
        assert!(store.get(-1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn adjust_played_moves_both_ways_and_clamps() {
        let store = PlaybackStore::spawn();
        store.insert(state(-2, 100)).await.unwrap();

        assert_eq!(store.adjust_played(-2, 20).await.unwrap(), Some(120));
        assert_eq!(store.adjust_played(-2, -50).await.unwrap(), Some(70));
        assert_eq!(store.adjust_played(-2, -500).await.unwrap(), Some(0));
        assert_eq!(store.adjust_played(-3, 5).await.unwrap(), None);
    }

    #[tokio::test]
    async fn concurrent_adjustments_are_all_applied() {
        let store = PlaybackStore::spawn();
        store.insert(state(-4, 0)).await.unwrap();

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..50 {
            let store = store.clone();
            tasks.spawn(async move { store.adjust_played(-4, 2).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        assert_eq!(store.get(-4).await.unwrap().unwrap().played_seconds, 100);
    }
}
