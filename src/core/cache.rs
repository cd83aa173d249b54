use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Byte-oriented collection with optional per-entry expiry.
#[async_trait]
pub trait KeyValueCollection: Send + Sync {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>>;

    async fn put(&self, key: &[u8], value: &[u8], ttl: Option<Duration>);

    async fn remove(&self, key: &[u8]);
}

pub trait Store: Send + Sync {
    /// Returns the named collection, creating it on first use. With
    /// `persist` the collection is disk-backed and `None` is returned when
    /// no disk store is available.
    fn get_collection(&self, name: &str, persist: bool) -> Option<Arc<dyn KeyValueCollection>>;
}
