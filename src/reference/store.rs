//! Versioned holder for the reference table
//!
//! A computation takes one snapshot and keeps it until it finishes; `replace`
//! installs a new table under the next version without touching old snapshots.

use super::HistoricalReferenceData;
use crate::error::ReferenceError;
use std::sync::{Arc, PoisonError, RwLock};

/// An immutable table tagged with the version it was installed under
#[derive(Debug)]
pub struct ReferenceSnapshot {
    pub version: u64,
    pub data: Arc<HistoricalReferenceData>,
}

/// Current reference table plus the swap point for replacing it
#[derive(Debug)]
pub struct ReferenceStore {
    current: RwLock<Arc<ReferenceSnapshot>>,
}

impl ReferenceStore {
    /// Start at version 1 with the given table
    pub fn new(data: Arc<HistoricalReferenceData>) -> Self {
        Self {
            current: RwLock::new(Arc::new(ReferenceSnapshot { version: 1, data })),
        }
    }

    /// Snapshot to use for one or more computations
    pub fn snapshot(&self) -> Arc<ReferenceSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Version of the table currently installed
    pub fn version(&self) -> u64 {
        self.snapshot().version
    }

    /// Install a new table; returns its version
    ///
    /// A table that fails validation is refused and the current one stays.
    pub fn replace(&self, data: Arc<HistoricalReferenceData>) -> Result<u64, ReferenceError> {
        data.validate()?;

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let version = guard.version + 1;
        *guard = Arc::new(ReferenceSnapshot { version, data });
        log::info!("Reference data replaced, now at version {}", version);
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{builtin, PairReference, StrategyReference};

    #[test]
    fn test_replace_bumps_version_and_keeps_old_snapshot() {
        let store = ReferenceStore::new(builtin());
        let before = store.snapshot();
        assert_eq!(before.version, 1);

        let version = store.replace(Arc::new(HistoricalReferenceData::default())).unwrap();
        assert_eq!(version, 2);
        assert_eq!(store.version(), 2);

        // The earlier snapshot still sees the original table
        assert_eq!(before.data.strategies.len(), 4);
        assert!(store.snapshot().data.strategies.is_empty());
    }

    #[test]
    fn test_replace_refuses_invalid_table() {
        let store = ReferenceStore::new(builtin());
        let bad = HistoricalReferenceData::new(vec![StrategyReference {
            name: "Falcon".to_string(),
            description: String::new(),
            pairs: vec![PairReference::new("GBPUSD", f64::NAN, 1.0)],
        }]);

        let err = store.replace(Arc::new(bad)).unwrap_err();
        assert!(matches!(err, ReferenceError::Invalid(_)));
        assert_eq!(store.version(), 1);
        assert_eq!(store.snapshot().data.strategies.len(), 4);
    }
}
