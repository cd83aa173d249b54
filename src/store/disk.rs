use crate::core::cache::KeyValueCollection;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fjall::{Keyspace, PartitionHandle};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize, Deserialize)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<DateTime<Utc>>,
}

/// Collection stored in a fjall partition. Entries are JSON-encoded
/// together with their expiry time.
pub struct DiskCollection {
    // keeps the keyspace's background workers alive
    _keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(keyspace: Keyspace, partition: PartitionHandle) -> Self {
        Self {
            _keyspace: keyspace,
            partition,
        }
    }

    fn read(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some(raw) = self.partition.get(key)? else {
            return Ok(None);
        };
        let entry: CacheEntry = serde_json::from_slice(&raw)?;
        if entry.expires_at.is_some_and(|expires_at| Utc::now() > expires_at) {
            debug!("Cache entry expired for key: {}", String::from_utf8_lossy(key));
            self.partition.remove(key)?;
            return Ok(None);
        }
        Ok(Some(entry.value))
    }

    fn write(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let expires_at = match ttl {
            Some(ttl) => Some(Utc::now() + chrono::Duration::from_std(ttl)?),
            None => None,
        };
        let entry = CacheEntry {
            value: value.to_vec(),
            expires_at,
        };
        self.partition.insert(key, serde_json::to_vec(&entry)?)?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueCollection for DiskCollection {
    async fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.read(key) {
            Ok(Some(value)) => {
                debug!("Cache HIT for key: {}", String::from_utf8_lossy(key));
                Some(value)
            }
            Ok(None) => {
                debug!("Cache MISS for key: {}", String::from_utf8_lossy(key));
                None
            }
            Err(e) => {
                debug!("DiskCollection get error: {}", e);
                None
            }
        }
    }

    async fn put(&self, key: &[u8], value: &[u8], ttl: Option<Duration>) {
        match self.write(key, value, ttl) {
            Ok(()) => debug!("Cache PUT for key: {}", String::from_utf8_lossy(key)),
            Err(e) => debug!("DiskCollection put error: {}", e),
        }
    }

    async fn remove(&self, key: &[u8]) {
        if let Err(e) = self.partition.remove(key) {
            debug!("DiskCollection remove error: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fjall::PartitionCreateOptions;
    use tempfile::tempdir;
    use tokio::time::sleep;

    fn open_collection(path: &std::path::Path) -> DiskCollection {
        let keyspace = fjall::Config::new(path).open().unwrap();
        let partition = keyspace
            .open_partition("test", PartitionCreateOptions::default())
            .unwrap();
        DiskCollection::new(keyspace, partition)
    }

    #[tokio::test]
    async fn test_disk_cache_get_put() {
        let dir = tempdir().unwrap();
        let cache = open_collection(dir.path());

        assert!(cache.get(b"key1").await.is_none());

        cache.put(b"key1", b"123", None).await;

        assert_eq!(cache.get(b"key1").await, Some(b"123".to_vec()));
        assert!(cache.get(b"key2").await.is_none());
    }

    #[tokio::test]
    async fn test_disk_cache_ttl_expiration() {
        let dir = tempdir().unwrap();
        let cache = open_collection(dir.path());

        cache
            .put(b"key1", b"123", Some(Duration::from_millis(10)))
            .await;
        assert_eq!(cache.get(b"key1").await, Some(b"123".to_vec()));

        sleep(Duration::from_millis(20)).await;
        assert!(cache.get(b"key1").await.is_none());
    }

    #[tokio::test]
    async fn test_disk_cache_remove() {
        let dir = tempdir().unwrap();
        let cache = open_collection(dir.path());

        cache.put(b"key1", b"123", None).await;
        cache.remove(b"key1").await;
        assert!(cache.get(b"key1").await.is_none());
    }
}
