use crate::core::cache::KeyValueCollection;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Process-lifetime collection backed by a HashMap.
#[derive(Debug, Default)]
pub struct MemoryCollection {
    inner: RwLock<HashMap<String, f64>>,
}

impl MemoryCollection {
    /// Creates a new, empty MemoryCollection
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueCollection for MemoryCollection {
    fn get(&self, key: &str) -> Option<f64> {
        let entries = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let value = entries.get(key).copied();
        if value.is_some() {
            debug!("Collection HIT for key: {key}");
        } else {
            debug!("Collection MISS for key: {key}");
        }
        value
    }

    fn set(&self, key: &str, value: f64) {
        let mut entries = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        debug!("Collection PUT for key: {key}");
        entries.insert(key.to_string(), value);
    }
}
