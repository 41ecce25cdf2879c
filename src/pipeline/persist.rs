// src/pipeline/persist.rs

//! Incremental persistence of normalized records.
//!
//! Two layouts are supported:
//!
//! - **Batched**: records are buffered and each full batch becomes its
//!   own file, `{prefix}-{start}-{end}.csv`. A crash loses at most the
//!   unflushed batch.
//! - **Append**: every record is appended to one growing CSV ledger.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::Record;
use crate::pipeline::ledger::DedupLedger;
use crate::storage::{RecordStore, csv};

/// Target storage shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistPolicy {
    /// Flush every `size` records into a separately named unit.
    Batched { size: usize, prefix: String },
    /// Append each record to `file`, writing the header only once.
    Append { file: String },
}

impl PersistPolicy {
    /// Storage keys that hold committed records, in record order.
    pub async fn durable_units(&self, store: &dyn RecordStore) -> Result<Vec<String>> {
        match self {
            PersistPolicy::Batched { prefix, .. } => list_units(store, prefix).await,
            PersistPolicy::Append { file } => Ok(if store.exists(file).await? {
                vec![file.clone()]
            } else {
                Vec::new()
            }),
        }
    }
}

/// File name of the unit covering records `start..=end`.
pub fn unit_name(prefix: &str, start: usize, end: usize) -> String {
    format!("{prefix}-{start}-{end}.csv")
}

/// Record range of a unit file name, `None` for anything else.
pub fn parse_unit_range(prefix: &str, name: &str) -> Option<(usize, usize)> {
    let range = name
        .strip_prefix(prefix)?
        .strip_prefix('-')?
        .strip_suffix(".csv")?;
    let (start, end) = range.split_once('-')?;
    Some((start.parse().ok()?, end.parse().ok()?))
}

/// Units with `prefix`, sorted by their starting record.
pub async fn list_units(store: &dyn RecordStore, prefix: &str) -> Result<Vec<String>> {
    let mut units: Vec<(usize, String)> = store
        .list(&format!("{prefix}-"))
        .await?
        .into_iter()
        .filter_map(|name| parse_unit_range(prefix, &name).map(|(start, _)| (start, name)))
        .collect();
    units.sort();
    Ok(units.into_iter().map(|(_, name)| name).collect())
}

/// Concatenate every unit with `prefix` into `output`.
///
/// Returns the number of units combined.
pub async fn combine_units(store: &dyn RecordStore, prefix: &str, output: &str) -> Result<usize> {
    let units = list_units(store, prefix).await?;
    let mut files = Vec::with_capacity(units.len());
    for unit in &units {
        if let Some(bytes) = store.read_bytes(unit).await? {
            files.push(bytes);
        }
    }
    if files.is_empty() {
        log::warn!("No units with prefix '{}' to combine", prefix);
        return Ok(0);
    }

    let combined = csv::concat(&files)?;
    store.write_bytes(output, &combined).await?;
    log::info!("Combined {} units into {}", files.len(), output);
    Ok(files.len())
}

/// Buffers records and commits them according to a [`PersistPolicy`].
///
/// Keys reach the ledger only after their records are durable.
pub struct Persister<'a, R: Record> {
    store: &'a dyn RecordStore,
    policy: PersistPolicy,
    batch: Vec<R>,
    pending: HashSet<String>,
    pending_natural: HashSet<String>,
    /// Number of the next record in batched numbering
    next_start: usize,
    /// Append target already has a header row
    has_header: bool,
    written_units: Vec<String>,
    committed: usize,
}

impl<'a, R: Record> Persister<'a, R> {
    /// Prepare a persister, continuing numbering after existing units.
    pub async fn open(store: &'a dyn RecordStore, policy: PersistPolicy) -> Result<Self> {
        let (next_start, has_header) = match &policy {
            PersistPolicy::Batched { prefix, .. } => {
                let last_end = list_units(store, prefix)
                    .await?
                    .iter()
                    .filter_map(|name| parse_unit_range(prefix, name))
                    .map(|(_, end)| end)
                    .max()
                    .unwrap_or(0);
                (last_end + 1, false)
            }
            PersistPolicy::Append { file } => {
                let non_empty = store
                    .read_bytes(file)
                    .await?
                    .is_some_and(|bytes| !bytes.is_empty());
                (1, non_empty)
            }
        };

        Ok(Self {
            store,
            policy,
            batch: Vec::new(),
            pending: HashSet::new(),
            pending_natural: HashSet::new(),
            next_start,
            has_header,
            written_units: Vec::new(),
            committed: 0,
        })
    }

    /// Whether `key` is buffered but not yet committed.
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.contains(key)
    }

    /// Whether a buffered record carries `natural_key`.
    pub fn is_pending_natural(&self, natural_key: &str) -> bool {
        self.pending_natural.contains(natural_key)
    }

    /// Add a record, committing whatever the policy says is due.
    pub async fn append(&mut self, record: R, ledger: &mut DedupLedger) -> Result<()> {
        match self.policy.clone() {
            PersistPolicy::Batched { size, .. } => {
                self.pending.insert(record.key().to_string());
                if let Some(natural) = record.natural_key() {
                    self.pending_natural.insert(natural.to_string());
                }
                self.batch.push(record);
                if self.batch.len() >= size {
                    self.flush(ledger).await?;
                }
            }
            PersistPolicy::Append { file } => {
                let bytes = csv::encode_records(std::slice::from_ref(&record), !self.has_header)?;
                self.store.append_bytes(&file, &bytes).await?;
                self.has_header = true;
                self.committed += 1;
                ledger.commit(&record);
            }
        }
        Ok(())
    }

    /// Write the current batch as one unit.
    async fn flush(&mut self, ledger: &mut DedupLedger) -> Result<()> {
        let PersistPolicy::Batched { prefix, .. } = &self.policy else {
            return Ok(());
        };
        if self.batch.is_empty() {
            return Ok(());
        }

        let start = self.next_start;
        let end = start + self.batch.len() - 1;
        let name = unit_name(prefix, start, end);

        let bytes = csv::encode_records(&self.batch, true)?;
        self.store.write_bytes(&name, &bytes).await?;
        log::info!("Saved {} records to {}", self.batch.len(), name);

        for record in self.batch.drain(..) {
            ledger.commit(&record);
        }
        self.committed += end - start + 1;
        self.pending.clear();
        self.pending_natural.clear();
        self.next_start = end + 1;
        self.written_units.push(name);
        Ok(())
    }

    /// Flush any partial batch at the end of a run.
    pub async fn finish(&mut self, ledger: &mut DedupLedger) -> Result<()> {
        self.flush(ledger).await
    }

    /// Units written by this persister, in order.
    pub fn written_units(&self) -> &[String] {
        &self.written_units
    }

    /// Records made durable by this persister.
    pub fn committed(&self) -> usize {
        self.committed
    }

    pub fn buffered(&self) -> usize {
        self.batch.len()
    }
}
