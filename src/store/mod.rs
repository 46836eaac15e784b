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
use tracing::debug;

/// A thread-safe key-value store that can hold multiple collections.
///
/// Persistent collections live in a fjall keyspace under the data directory.
/// If the keyspace cannot be opened they are unavailable and
/// [`Store::get_collection`] returns `None` for them.
pub struct KeyValueStore {
    memory: RwLock<HashMap<String, Arc<MemoryCollection>>>,
    disk: RwLock<HashMap<String, Arc<DiskCollection>>>,
    keyspace: Option<Keyspace>,
}

impl KeyValueStore {
    pub fn new(data_path: Option<&Path>) -> Self {
        let keyspace = data_path.and_then(|path| {
            let cache_dir = path.join("cache");
            match fjall::Config::new(&cache_dir).open() {
                Ok(keyspace) => Some(keyspace),
                Err(e) => {
                    debug!("Failed to open keyspace at {}: {e}", cache_dir.display());
                    None
                }
            }
        });

        Self {
            memory: RwLock::new(HashMap::new()),
            disk: RwLock::new(HashMap::new()),
            keyspace,
        }
    }

    /// A store holding only in-memory collections.
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    pub fn is_persistent(&self) -> bool {
        self.keyspace.is_some()
    }

    /// Syncs persistent collections to disk.
    pub fn flush(&self) -> anyhow::Result<()> {
        if let Some(keyspace) = &self.keyspace {
            keyspace.persist(fjall::PersistMode::SyncAll)?;
        }
        Ok(())
    }

    fn open_disk(&self, name: &str) -> Option<Arc<DiskCollection>> {
        let keyspace = self.keyspace.as_ref()?;
        match keyspace.open_partition(name, PartitionCreateOptions::default()) {
            Ok(partition) => Some(Arc::new(DiskCollection::new(partition))),
            Err(e) => {
                debug!("Failed to open partition {name}: {e}");
                None
            }
        }
    }
}

impl Default for KeyValueStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Store for KeyValueStore {
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>> {
        if persist {
            let mut disk = self.disk.write().unwrap_or_else(PoisonError::into_inner);
            if let Some(collection) = disk.get(name) {
                return Some(Arc::clone(collection) as Arc<dyn KeyValueCollection>);
            }
            // fjall partitions are created on open, so only open when asked to
            if !create_if_missing {
                return None;
            }
            let collection = self.open_disk(name)?;
            disk.insert(name.to_string(), Arc::clone(&collection));
            Some(collection as Arc<dyn KeyValueCollection>)
        } else {
            let mut memory = self.memory.write().unwrap_or_else(PoisonError::into_inner);
            if let Some(collection) = memory.get(name) {
                return Some(Arc::clone(collection) as Arc<dyn KeyValueCollection>);
            }
            if !create_if_missing {
                return None;
            }
            let collection = Arc::new(MemoryCollection::new());
            memory.insert(name.to_string(), Arc::clone(&collection));
            Some(collection as Arc<dyn KeyValueCollection>)
        }
    }

    fn remove_collection(&self, name: &str) -> bool {
        let removed_memory = self
            .memory
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some();
        let removed_disk = self
            .disk
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name)
            .is_some();
        removed_memory || removed_disk
    }
}
