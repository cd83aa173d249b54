use crate::core::ReferenceProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

/// Reads reference documents from the local filesystem.
#[derive(Debug, Default, Clone)]
pub struct FileProvider;

impl FileProvider {
    pub fn new() -> Self {
        FileProvider
    }
}

#[async_trait]
impl ReferenceProvider for FileProvider {
    async fn fetch_document(&self, location: &str) -> Result<String> {
        debug!("Reading reference document from {}", location);
        tokio::fs::read_to_string(location)
            .await
            .with_context(|| format!("Failed to read reference file: {location}"))
    }
}
