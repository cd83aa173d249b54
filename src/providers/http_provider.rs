use crate::core::ReferenceProvider;
use crate::core::cache::{KeyValueCollection, Store};
use crate::providers::retry::RetryPolicy;
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const COLLECTION: &str = "reference";
const RETRY: RetryPolicy = RetryPolicy::new(3, Duration::from_millis(500));

/// Downloads reference documents over HTTP and caches the bodies.
pub struct HttpProvider {
    client: reqwest::Client,
    cache: Arc<dyn KeyValueCollection>,
    ttl: Duration,
}

impl HttpProvider {
    /// Uses a persistent cache collection when the store has one, else an
    /// in-memory one.
    pub fn new(store: &dyn Store, ttl: Duration) -> Result<Self> {
        let cache = store
            .get_collection(COLLECTION, true)
            .or_else(|| store.get_collection(COLLECTION, false))
            .context("Could not create cache collection for reference documents")?;
        Self::with_collection(cache, ttl)
    }

    pub fn with_collection(cache: Arc<dyn KeyValueCollection>, ttl: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("amcolor/1.0")
            .build()?;
        Ok(HttpProvider { client, cache, ttl })
    }
}

#[async_trait]
impl ReferenceProvider for HttpProvider {
    async fn fetch_document(&self, location: &str) -> Result<String> {
        if let Some(cached) = self.cache.get(location.as_bytes()).await {
            return String::from_utf8(cached)
                .with_context(|| format!("Cached document is not UTF-8: {location}"));
        }

        debug!("Requesting reference document from {}", location);
        let response = RETRY
            .run(|| self.client.get(location).send())
            .await
            .with_context(|| format!("Failed to send request for {location}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("{} → {}", location, status.as_u16()));
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to get response text for {location}"))?;

        if body.trim().is_empty() {
            return Err(anyhow!("Received empty response for {}", location));
        }

        self.cache
            .put(location.as_bytes(), body.as_bytes(), Some(self.ttl))
            .await;

        Ok(body)
    }

    async fn discard(&self, location: &str) {
        debug!("Dropping cached copy of {}", location);
        self.cache.remove(location.as_bytes()).await;
    }
}
