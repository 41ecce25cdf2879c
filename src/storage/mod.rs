//! Storage abstractions for record persistence.
//!
//! Records are stored as flat CSV files under one root directory:
//!
//! ```text
//! storage/
//! ├── config.toml                    # Harvest configuration
//! ├── last_run.json                  # Report of the most recent run
//! ├── imdb-top-movies-1-100.csv      # Batched units (one per flush)
//! ├── imdb-top-movies-101-200.csv
//! ├── imdb-top-movies.csv            # Combined output
//! ├── wanted_list.csv                # Append-only ledger
//! └── photos/
//!     └── 1234-2019.jpg              # Write-once assets
//! ```

pub mod csv;
pub mod local;

use async_trait::async_trait;

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;

/// Keyed byte storage backing the persister, ledger and asset store.
///
/// Keys are `/`-separated paths relative to the store root.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Replace `key` atomically; readers never see a partial file.
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Append to `key`, creating it if needed.
    async fn append_bytes(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Read `key`, returning `None` if it does not exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Keys at the store root whose name starts with `prefix`.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
