//! HTTP client for the voice-chat bridge that owns the actual call.

use async_trait::async_trait;
use encore_core::{SeekTarget, StreamSeeker, TransportError};
use reqwest::StatusCode;
use tracing::{debug, warn};

/// Posts seek targets as JSON to the bridge's seek endpoint.
///
/// 2xx means the stream moved, 404 means the bridge has no call for the chat,
/// any other status is a rejection carrying the response body.
pub struct HttpStreamSeeker {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpStreamSeeker {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl StreamSeeker for HttpStreamSeeker {
    async fn seek(&self, target: &SeekTarget) -> Result<(), TransportError> {
        debug!(endpoint = %self.endpoint, chat_id = target.chat_id, "Posting seek to bridge");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(target)
            .send()
            .await
            .map_err(|e| TransportError::Unknown(e.without_url().to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::NOT_FOUND {
            return Err(TransportError::NoActiveCall);
        }

        let body = resp.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "Bridge rejected seek");
        Err(TransportError::Rejected(format!("{status}: {body}")))
    }
}
