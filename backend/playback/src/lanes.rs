//! Per-chat seek lanes.
//!
//! A router task owns one lane per chat. Each lane runs its seeks strictly one
//! after another, so two seeks in the same chat can never read the same
//! position and both apply their offset. Different chats proceed independently.
//! A lane is closed as soon as it has no queued or running seek.

use std::collections::HashMap;
use std::sync::Arc;

use encore_core::{ChatId, SeekDirection, SeekError, TransportError};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, Instrument};
use uuid::Uuid;

use crate::seek::{SeekController, SeekOutcome, QUICK_SEEK_SECONDS};

const ROUTER_BUFFER_SIZE: usize = 256;

struct SeekJob {
    raw_offset: Option<String>,
    direction: SeekDirection,
    request_id: Uuid,
    respond_to: oneshot::Sender<Result<SeekOutcome, SeekError>>,
}

enum RouterMessage {
    Seek(ChatId, SeekJob),
    OpenLanes(oneshot::Sender<usize>),
}

struct Lane {
    tx: mpsc::UnboundedSender<SeekJob>,
    pending: usize,
}

/// Cloneable front door to the seek lanes.
#[derive(Clone)]
pub struct SeekService {
    router_tx: mpsc::Sender<RouterMessage>,
}

impl SeekService {
    pub fn spawn(controller: Arc<SeekController>) -> Self {
        let (router_tx, router_rx) = mpsc::channel(ROUTER_BUFFER_SIZE);
        tokio::spawn(route(controller, router_rx));
        Self { router_tx }
    }

    /// Seek by a user-supplied offset.
    pub async fn seek(
        &self,
        chat_id: ChatId,
        raw_offset: Option<&str>,
        direction: SeekDirection,
    ) -> Result<SeekOutcome, SeekError> {
        let (respond_to, rx) = oneshot::channel();
        let job = SeekJob {
            raw_offset: raw_offset.map(str::to_string),
            direction,
            request_id: Uuid::new_v4(),
            respond_to,
        };

        if self.router_tx.send(RouterMessage::Seek(chat_id, job)).await.is_err() {
            return Err(lane_gone());
        }
        rx.await.unwrap_or_else(|_| Err(lane_gone()))
    }

    /// Seek by the fixed quick-action offset.
    pub async fn quick_seek(
        &self,
        chat_id: ChatId,
        direction: SeekDirection,
    ) -> Result<SeekOutcome, SeekError> {
        let offset = QUICK_SEEK_SECONDS.to_string();
        self.seek(chat_id, Some(&offset), direction).await
    }

    /// Number of chats with a seek queued or in flight. Zero once the router
    /// has stopped.
    pub async fn open_lanes(&self) -> usize {
        let (respond_to, rx) = oneshot::channel();
        if self.router_tx.send(RouterMessage::OpenLanes(respond_to)).await.is_err() {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}

fn lane_gone() -> SeekError {
    SeekError::SeekFailed(TransportError::Unknown("seek lane stopped".into()))
}

async fn route(controller: Arc<SeekController>, mut rx: mpsc::Receiver<RouterMessage>) {
    let mut lanes: HashMap<ChatId, Lane> = HashMap::new();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<ChatId>();

    loop {
        tokio::select! {
            biased;

            Some(chat_id) = done_rx.recv() => {
                let idle = lanes.get_mut(&chat_id).is_some_and(|lane| {
                    lane.pending = lane.pending.saturating_sub(1);
                    lane.pending == 0
                });
                if idle {
                    // Dropping the sender ends the lane task.
                    lanes.remove(&chat_id);
                    debug!(chat_id, "Closing idle seek lane");
                }
            }

            message = rx.recv() => match message {
                Some(RouterMessage::Seek(chat_id, job)) => {
                    let lane = lanes.entry(chat_id).or_insert_with(|| Lane {
                        tx: spawn_lane(chat_id, controller.clone(), done_tx.clone()),
                        pending: 0,
                    });

                    match lane.tx.send(job) {
                        Ok(()) => lane.pending += 1,
                        Err(mpsc::error::SendError(job)) => {
                            // The lane task ended (it only does so by panicking); replace it.
                            let fresh = spawn_lane(chat_id, controller.clone(), done_tx.clone());
                            let _ = fresh.send(job);
                            lanes.insert(chat_id, Lane { tx: fresh, pending: 1 });
                        }
                    }
                }
                Some(RouterMessage::OpenLanes(respond_to)) => {
                    let _ = respond_to.send(lanes.len());
                }
                None => break,
            },
        }
    }

    debug!(lanes = lanes.len(), "Seek router stopped");
}

fn spawn_lane(
    chat_id: ChatId,
    controller: Arc<SeekController>,
    done_tx: mpsc::UnboundedSender<ChatId>,
) -> mpsc::UnboundedSender<SeekJob> {
    let (tx, mut rx) = mpsc::unbounded_channel::<SeekJob>();
    debug!(chat_id, "Opening seek lane");

    tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            let span = tracing::info_span!("seek", chat_id, request_id = %job.request_id);
            let result = controller
                .seek(chat_id, job.raw_offset.as_deref(), job.direction)
                .instrument(span)
                .await;
            // Report completion before replying so the router has counted it
            // by the time the caller sees the result.
            let _ = done_tx.send(chat_id);
            let _ = job.respond_to.send(result);
        }
    });

    tx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PlaybackStore;
    use async_trait::async_trait;
    use encore_core::{
        PlaybackState, ResolveError, SeekTarget, StreamKind, StreamSeeker, VideoResolver,
    };
    use std::time::Duration;

    /// Transport that takes a while, widening the window for interleaving.
    struct SlowSeeker;

    #[async_trait]
    impl StreamSeeker for SlowSeeker {
        async fn seek(&self, _target: &SeekTarget) -> Result<(), TransportError> {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(())
        }
    }

    struct NoResolver;

    #[async_trait]
    impl VideoResolver for NoResolver {
        async fn resolve(&self, video_id: &str, _direct: bool) -> Result<String, ResolveError> {
            Err(ResolveError::NotFound(video_id.to_string()))
        }
    }

    fn state(chat_id: ChatId, played: u64, total: u64) -> PlaybackState {
        PlaybackState {
            chat_id,
            total_duration_seconds: total,
            played_seconds: played,
            duration_label: "10:00".into(),
            source: "downloads/x.webm".into(),
            video_id: "x".into(),
            speed_path: None,
            stream_kind: StreamKind::Video,
        }
    }

    async fn service(states: Vec<PlaybackState>) -> (SeekService, PlaybackStore) {
        let store = PlaybackStore::spawn();
        for s in states {
            store.insert(s).await.unwrap();
        }
        let controller = SeekController::new(store.clone(), Arc::new(SlowSeeker), Arc::new(NoResolver));
        (SeekService::spawn(Arc::new(controller)), store)
    }

    #[tokio::test]
    async fn same_chat_seeks_are_serialized() {
        // 100 + 20*k stays > 10s from the end for k <= 12 only.
        let (svc, store) = service(vec![state(-1, 100, 360)]).await;

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..15 {
            let svc = svc.clone();
            tasks.spawn(async move { svc.quick_seek(-1, SeekDirection::Forward).await });
        }
        let mut applied = 0;
        let mut rejected = 0;
        while let Some(result) = tasks.join_next().await {
            match result.unwrap() {
                Ok(_) => applied += 1,
                Err(SeekError::TooCloseToBoundary { .. }) => rejected += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(applied, 12);
        assert_eq!(rejected, 3);
        assert_eq!(store.get(-1).await.unwrap().unwrap().played_seconds, 340);
    }

    #[tokio::test]
    async fn chats_do_not_share_lanes() {
        let (svc, store) = service(vec![state(-1, 100, 600), state(-2, 300, 600)]).await;

        let (a, b) = tokio::join!(
            svc.quick_seek(-1, SeekDirection::Forward),
            svc.quick_seek(-2, SeekDirection::Backward),
        );
        assert_eq!(a.unwrap().played_seconds, 120);
        assert_eq!(b.unwrap().played_seconds, 280);
        assert_eq!(store.get(-1).await.unwrap().unwrap().played_seconds, 120);
        assert_eq!(store.get(-2).await.unwrap().unwrap().played_seconds, 280);
    }

    #[tokio::test]
    async fn idle_lanes_are_closed_and_reopened_on_demand() {
        let (svc, store) = service(vec![state(-1, 100, 600), state(-2, 300, 600)]).await;

        let mut tasks = tokio::task::JoinSet::new();
        for chat_id in [-1, -2, -1, -2, -1] {
            let svc = svc.clone();
            tasks.spawn(async move { svc.quick_seek(chat_id, SeekDirection::Forward).await });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }
        assert_eq!(svc.open_lanes().await, 0);

        let outcome = svc.quick_seek(-1, SeekDirection::Backward).await.unwrap();
        assert_eq!(outcome.played_seconds, 140);
        assert_eq!(svc.open_lanes().await, 0);
        assert_eq!(store.get(-2).await.unwrap().unwrap().played_seconds, 340);
    }

    /// Transport that holds each seek until the test releases it.
    struct GatedSeeker(Arc<tokio::sync::Semaphore>);

    #[async_trait]
    impl StreamSeeker for GatedSeeker {
        async fn seek(&self, _target: &SeekTarget) -> Result<(), TransportError> {
            self.0.acquire().await.unwrap().forget();
            Ok(())
        }
    }

    #[tokio::test]
    async fn lane_stays_open_while_a_seek_is_running() {
        let store = PlaybackStore::spawn();
        store.insert(state(-1, 100, 600)).await.unwrap();
        let gate = Arc::new(tokio::sync::Semaphore::new(0));
        let controller =
            SeekController::new(store, Arc::new(GatedSeeker(gate.clone())), Arc::new(NoResolver));
        let svc = SeekService::spawn(Arc::new(controller));

        let running = {
            let svc = svc.clone();
            tokio::spawn(async move { svc.quick_seek(-1, SeekDirection::Forward).await })
        };
        while svc.open_lanes().await == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(svc.open_lanes().await, 1);

        gate.add_permits(1);
        assert_eq!(running.await.unwrap().unwrap().played_seconds, 120);
        assert_eq!(svc.open_lanes().await, 0);
    }

    #[tokio::test]
    async fn quick_seek_uses_twenty_seconds() {
        let (svc, _store) = service(vec![state(-5, 50, 600)]).await;
        let outcome = svc.quick_seek(-5, SeekDirection::Backward).await.unwrap();
        assert_eq!(outcome.offset, QUICK_SEEK_SECONDS);
        assert_eq!(outcome.target_seconds, 31);
        assert_eq!(outcome.played_seconds, 30);
    }
}
