// src/models/record.rs

//! Work items, raw page extractions, and the persisted record contract.

use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

/// One unit of discovered work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Natural key, also the ledger key of the resulting record
    pub key: String,

    /// Page to fetch for this item
    pub url: String,

    /// 1-based discovery order
    pub position: usize,
}

/// Unparsed field values produced by a single page visit.
#[derive(Debug, Clone, Default)]
pub struct RawRecord {
    /// URL the fields were extracted from
    pub source: String,
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Trimmed field value; absent and blank fields are `None`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Field value, or a schema violation naming the field.
    pub fn require(&self, field: &str) -> Result<&str> {
        self.get(field)
            .ok_or_else(|| AppError::schema(field, "required field is missing"))
    }

    /// Field value with a stated default for absent fields.
    pub fn get_or<'a>(&'a self, field: &str, default: &'a str) -> &'a str {
        self.get(field).unwrap_or(default)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }
}

/// A binary asset that belongs to a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// Storage key the asset is written to
    pub key: String,
    pub url: String,
}

/// A normalized record with a fixed field set.
///
/// Field order is the struct's declaration order, so every
/// serialized row has the same columns.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// CSV column holding the ledger key.
    const KEY_COLUMN: &'static str;

    /// CSV column holding the natural identity, when it differs from the key.
    const NATURAL_KEY_COLUMN: Option<&'static str> = None;

    /// Ledger key of this record.
    fn key(&self) -> &str;

    /// Identity of the real-world entity, shared by records reached
    /// through different keys.
    fn natural_key(&self) -> Option<&str> {
        None
    }

    /// Human-readable name for progress output.
    fn label(&self) -> &str;

    /// Asset to download alongside the record, if any.
    fn asset(&self) -> Option<AssetRef> {
        None
    }
}
