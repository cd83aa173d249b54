//! Access to the raw reference documents.

use anyhow::Result;
use async_trait::async_trait;

/// Fetches a reference document (fund list, AMC dataset, overrides) as
/// text. `location` is a path or a URL depending on the provider.
#[async_trait]
pub trait ReferenceProvider: Send + Sync {
    async fn fetch_document(&self, location: &str) -> Result<String>;

    /// Drops any cached copy of `location`, so the next fetch goes back to
    /// the source. Called when a fetched document fails to parse.
    async fn discard(&self, _location: &str) {}
}
