pub mod disk;
pub mod memory;

use crate::core::cache::{KeyValueCollection, Store};
use disk::DiskCollection;
use fjall::{Keyspace, PartitionCreateOptions};
use memory::MemoryCollection;
use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, PoisonError, RwLock},
};
use tracing::{debug, warn};

/// A thread-safe key-value store that can hold multiple collections.
pub struct KeyValueStore {
    collections: RwLock<HashMap<String, Arc<dyn KeyValueCollection>>>,
    keyspace: Option<Keyspace>,
}

impl KeyValueStore {
    /// Opens a store with a fjall keyspace under `data_dir/cache`. Without a
    /// directory, or when the keyspace cannot be opened, only in-memory
    /// collections are available.
    pub fn open(data_dir: Option<&Path>) -> Self {
        let keyspace = data_dir.and_then(|path| {
            let cache_dir = path.join("cache");
            match fjall::Config::new(&cache_dir).open() {
                Ok(keyspace) => Some(keyspace),
                Err(e) => {
                    warn!(
                        "Could not open cache at {}: {}. Using memory cache",
                        cache_dir.display(),
                        e
                    );
                    None
                }
            }
        });

        Self {
            collections: RwLock::new(HashMap::new()),
            keyspace,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(None)
    }

    fn collection_key(name: &str, persist: bool) -> String {
        if persist {
            format!("disk:{name}")
        } else {
            format!("memory:{name}")
        }
    }

    fn create_collection(&self, name: &str, persist: bool) -> Option<Arc<dyn KeyValueCollection>> {
        if !persist {
            return Some(Arc::new(MemoryCollection::new()));
        }
        let keyspace = self.keyspace.as_ref()?;
        match keyspace.open_partition(name, PartitionCreateOptions::default()) {
            Ok(partition) => Some(Arc::new(DiskCollection::new(keyspace.clone(), partition))),
            Err(e) => {
                warn!("Could not open cache partition {}: {}", name, e);
                None
            }
        }
    }
}

impl Store for KeyValueStore {
    fn get_collection(&self, name: &str, persist: bool) -> Option<Arc<dyn KeyValueCollection>> {
        let key = Self::collection_key(name, persist);
        if let Some(existing) = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Some(Arc::clone(existing));
        }

        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = collections.get(&key) {
            return Some(Arc::clone(existing));
        }
        let collection = self.create_collection(name, persist)?;
        debug!("Created cache collection {}", key);
        collections.insert(key, Arc::clone(&collection));
        Some(collection)
    }
}
