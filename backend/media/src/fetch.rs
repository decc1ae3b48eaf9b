use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use encore_core::{BlobFetcher, FetchedBlob};
use reqwest::Client;

const USER_AGENT: &str = "Encore/0.1 (+thumbnail fetcher)";
const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

/// GETs artwork over HTTP. Non-200 statuses are returned, not raised, so the
/// caller can decide whether to fall back.
pub struct HttpBlobFetcher {
    client: Client,
}

impl HttpBlobFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlobFetcher for HttpBlobFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedBlob> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?.to_vec();
        Ok(FetchedBlob { status, bytes })
    }
}
