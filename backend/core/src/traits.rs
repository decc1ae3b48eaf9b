use anyhow::Result;
use async_trait::async_trait;

use crate::error::{ResolveError, TransportError};
use crate::types::{ChatId, FetchedBlob, SeekTarget, UserId, VideoMetadata};

/// The voice-chat streaming backend that can reposition a running stream.
#[async_trait]
pub trait StreamSeeker: Send + Sync {
    async fn seek(&self, target: &SeekTarget) -> Result<(), TransportError>;
}

/// Turns a video id into a playable stream reference.
#[async_trait]
pub trait VideoResolver: Send + Sync {
    /// `direct` asks for a direct media URL rather than a downloaded file.
    async fn resolve(&self, video_id: &str, direct: bool) -> Result<String, ResolveError>;
}

/// Looks up title, duration, artwork and channel for a video.
#[async_trait]
pub trait MetadataSearch: Send + Sync {
    async fn search(&self, video_id: &str) -> Result<VideoMetadata>;
}

/// Plain HTTP GET returning the body and the status code.
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedBlob>;
}

/// Chat-membership lookups used for authorization.
#[async_trait]
pub trait ChatMemberLookup: Send + Sync {
    /// Whether `user_id` may manage voice/video chats in `chat_id`.
    async fn can_manage_video_chats(&self, chat_id: ChatId, user_id: UserId) -> Result<bool>;
}
