use crate::core::cache::KeyValueCollection;
use anyhow::Result;
use fjall::PartitionHandle;
use tracing::debug;

/// Collection persisted in a fjall partition.
///
/// Values are stored as the JSON integer of their bit pattern, since JSON has
/// no representation for infinities.
pub struct DiskCollection {
    partition: PartitionHandle,
}

impl DiskCollection {
    pub fn new(partition: PartitionHandle) -> Self {
        Self { partition }
    }

    fn try_get(&self, key: &str) -> Result<Option<f64>> {
        match self.partition.get(key)? {
            Some(bytes) => Ok(Some(f64::from_bits(serde_json::from_slice(&bytes)?))),
            None => Ok(None),
        }
    }

    fn try_set(&self, key: &str, value: f64) -> Result<()> {
        self.partition.insert(key, serde_json::to_vec(&value.to_bits())?)?;
        Ok(())
    }
}

impl KeyValueCollection for DiskCollection {
    fn get(&self, key: &str) -> Option<f64> {
        match self.try_get(key) {
            Ok(Some(value)) => {
                debug!("Collection HIT for key: {key}");
                Some(value)
            }
            Ok(None) => {
                debug!("Collection MISS for key: {key}");
                None
            }
            Err(e) => {
                debug!("DiskCollection get error for {key}: {e}");
                None
            }
        }
    }

    fn set(&self, key: &str, value: f64) {
        match self.try_set(key, value) {
            Ok(()) => debug!("Collection PUT for key: {key}"),
            Err(e) => debug!("DiskCollection put error for {key}: {e}"),
        }
    }
}
