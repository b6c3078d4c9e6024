//! HTTP access to EMP feeds

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::error::{FetchError, Result};
use stats_builder::config::FetchConfig;

/// Downloads one feed body
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// GET `url` and return the raw body; non-2xx and empty bodies are errors
    async fn get(&self, url: &str) -> Result<Vec<u8>>;
}

/// `reqwest`-backed feed client
pub struct HttpFeedClient {
    client: Client,
}

impl HttpFeedClient {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| FetchError::http(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }

        let body = response.bytes().await.map_err(|e| FetchError::http(url, e))?;
        if body.is_empty() {
            return Err(FetchError::EmptyBody(url.to_string()));
        }

        Ok(body.to_vec())
    }
}
