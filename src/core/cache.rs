//! Last-known value per entity, used to decide whether a refresh is needed.

use std::sync::Arc;
use tracing::debug;

/// A named key-value collection of derived costs.
///
/// Implementations are last-write-wins; a failed read behaves like a missing
/// key and a failed write is dropped.
pub trait KeyValueCollection: Send + Sync {
    fn get(&self, key: &str) -> Option<f64>;
    fn set(&self, key: &str, value: f64);
}

/// Hands out collections by name.
pub trait Store: Send + Sync {
    /// Returns `None` when the collection does not exist (and was not
    /// requested to be created) or when its backing storage is unavailable.
    fn get_collection(
        &self,
        name: &str,
        persist: bool,
        create_if_missing: bool,
    ) -> Option<Arc<dyn KeyValueCollection>>;

    fn remove_collection(&self, name: &str) -> bool;
}

/// Reports whether `entity_id`'s freshly computed value differs from the
/// last recorded one, recording the new value as a side effect.
///
/// Without a store every call reports a change and nothing is read or
/// written. A never-seen entity counts as changed only for a non-zero
/// value; a zero value leaves it unrecorded.
pub fn has_changed<F>(
    entity_id: &str,
    compute: F,
    store: Option<&dyn KeyValueCollection>,
) -> bool
where
    F: FnOnce() -> f64,
{
    let value = compute();
    let Some(store) = store else {
        debug!("No store for {entity_id}, reporting change");
        return true;
    };

    match store.get(entity_id) {
        None if value == 0.0 => {
            debug!("{entity_id} unrecorded and zero, no change");
            false
        }
        None => {
            debug!("{entity_id} recorded for the first time: {value}");
            store.set(entity_id, value);
            true
        }
        Some(previous) => {
            let changed = previous != value;
            debug!("{entity_id}: {previous} -> {value} (changed: {changed})");
            store.set(entity_id, value);
            changed
        }
    }
}

/// Like [`has_changed`] for computations that can fail.
///
/// An error from `compute` is returned as-is and the store is left untouched.
pub fn try_has_changed<F, E>(
    entity_id: &str,
    compute: F,
    store: Option<&dyn KeyValueCollection>,
) -> Result<bool, E>
where
    F: FnOnce() -> Result<f64, E>,
{
    let value = compute()?;
    Ok(has_changed(entity_id, || value, store))
}

/// [`has_changed`] bound to one collection for repeated use.
#[derive(Clone, Default)]
pub struct ChangeDetectingCache {
    store: Option<Arc<dyn KeyValueCollection>>,
}

impl ChangeDetectingCache {
    pub fn new(store: Option<Arc<dyn KeyValueCollection>>) -> Self {
        Self { store }
    }

    /// A cache with no store; it reports every observation as a change.
    pub fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn is_available(&self) -> bool {
        self.store.is_some()
    }

    pub fn has_changed<F>(&self, entity_id: &str, compute: F) -> bool
    where
        F: FnOnce() -> f64,
    {
        has_changed(entity_id, compute, self.store.as_deref())
    }

    pub fn try_has_changed<F, E>(&self, entity_id: &str, compute: F) -> Result<bool, E>
    where
        F: FnOnce() -> Result<f64, E>,
    {
        try_has_changed(entity_id, compute, self.store.as_deref())
    }
}
