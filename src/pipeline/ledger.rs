// src/pipeline/ledger.rs

//! Keys of every record already committed to storage.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::Record;
use crate::pipeline::persist::PersistPolicy;
use crate::storage::{RecordStore, csv};

/// Admission gate that keeps a run from re-fetching committed records.
///
/// Loaded once at start from the key column of persisted storage and
/// grown only after the persister commits a record. Natural keys are
/// tracked separately so one entity listed under two keys is stored once.
#[derive(Debug, Clone, Default)]
pub struct DedupLedger {
    keys: HashSet<String>,
    natural: HashSet<String>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every committed key for `policy` from `store`.
    ///
    /// `natural_column`, when given, is read into the natural key set.
    pub async fn load(
        store: &dyn RecordStore,
        policy: &PersistPolicy,
        key_column: &str,
        natural_column: Option<&str>,
    ) -> Result<Self> {
        let mut ledger = Self::new();
        for unit in policy.durable_units(store).await? {
            let Some(bytes) = store.read_bytes(&unit).await? else {
                continue;
            };
            if bytes.is_empty() {
                continue;
            }
            ledger.keys.extend(csv::read_column(&bytes, key_column)?);
            if let Some(column) = natural_column {
                ledger.natural.extend(
                    csv::read_column(&bytes, column)?
                        .into_iter()
                        .filter(|value| !value.is_empty()),
                );
            }
        }
        log::debug!("Ledger loaded {} existing keys", ledger.len());
        Ok(ledger)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn contains_natural(&self, natural_key: &str) -> bool {
        self.natural.contains(natural_key)
    }

    /// Mark `key` as committed.
    pub fn record(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    /// Mark both keys of a durable `record` as committed.
    pub fn commit<R: Record>(&mut self, record: &R) {
        self.record(record.key());
        if let Some(natural) = record.natural_key() {
            self.natural.insert(natural.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DedupLedger {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
            natural: HashSet::new(),
        }
    }
}
