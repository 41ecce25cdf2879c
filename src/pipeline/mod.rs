//! Pipeline entry points for harvest operations.
//!
//! - `run_movies`: Batched harvest of the ranked movie listing
//! - `combine_movies`: Merge movie units into one file
//! - `run_wanted`: Append-only harvest of the wanted-persons listing

mod driver;
mod ledger;
mod movies;
mod persist;
mod resolver;
mod wanted;

pub use driver::{AssetFetcher, ExtractionDriver, Extractor};
pub use ledger::DedupLedger;
pub use movies::{combine_movies, run_movies};
pub use persist::{PersistPolicy, Persister, combine_units, list_units, unit_name};
pub use resolver::{Discovered, ListingSource, Resolution, WorkListResolver};
pub use wanted::run_wanted;

use chrono::Utc;

use crate::error::Result;
use crate::models::{Record, RunReport};
use crate::normalize::Normalizer;
use crate::storage::{LocalStorage, RecordStore};
use crate::utils::log;

/// Storage key of the most recent run report.
pub const LAST_RUN_FILE: &str = "last_run.json";

/// Discover, gate, extract and persist one source.
///
/// Discovery failures are fatal only when no item was resolved; the
/// partial work list is processed otherwise.
pub async fn harvest<N: Normalizer>(
    source: &mut dyn ListingSource,
    resolver: &WorkListResolver,
    driver: &ExtractionDriver<'_, N>,
    store: &dyn RecordStore,
    policy: PersistPolicy,
    report: &mut RunReport,
) -> Result<Vec<String>> {
    let key_column = <N::Output as Record>::KEY_COLUMN;
    let natural_column = <N::Output as Record>::NATURAL_KEY_COLUMN;
    let mut ledger = DedupLedger::load(store, &policy, key_column, natural_column).await?;
    log::sub_item(&format!("{} records already stored", ledger.len()));

    let (items, discovery_error) = resolver.resolve(source).await.into_items()?;
    report.discovered = items.len();
    if let Some(e) = discovery_error {
        ::log::warn!("Continuing with {} items: {}", items.len(), e);
        report.discovery_error = Some(e.to_string());
    }
    log::sub_item(&format!("{} items discovered", items.len()));

    let mut persister = Persister::open(store, policy).await?;
    driver.run(&items, &mut ledger, &mut persister, report).await?;
    persister.finish(&mut ledger).await?;
    log::sub_item(&format!("{} records committed", persister.committed()));

    report.end_time = Utc::now();
    Ok(persister.written_units().to_vec())
}

/// Log the outcome of a run.
pub fn log_report(report: &RunReport) {
    let duration = report.end_time - report.start_time;
    log::summary(
        &format!("{} harvest", report.source),
        &[
            ("Discovered", report.discovered.to_string()),
            ("Already stored", report.skipped.to_string()),
            ("Records added", report.added.to_string()),
            ("Failed items", report.failures.len().to_string()),
            ("Failed assets", report.asset_failures.len().to_string()),
            ("Success rate", format!("{:.1}%", report.success_rate() * 100.0)),
            ("Duration", format!("{}s", duration.num_seconds())),
        ],
    );

    for failure in &report.failures {
        log::sub_item(&format!("{} ({}): {}", failure.key, failure.url, failure.reason));
    }
    if !report.asset_failures.is_empty() {
        ::log::warn!("Assets that need a manual download:");
        for failure in &report.asset_failures {
            log::sub_item(&format!("{} {} {}", failure.label, failure.key, failure.url));
        }
    }
}

/// Persist `report` as the latest run.
pub async fn save_report(storage: &LocalStorage, report: &RunReport) -> Result<()> {
    storage.write_json(LAST_RUN_FILE, report).await
}

/// Report of the latest run, if one was saved.
pub async fn load_report(storage: &LocalStorage) -> Result<Option<RunReport>> {
    storage.read_json(LAST_RUN_FILE).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{RawRecord, WorkItem};
    use crate::pipeline::persist::tests::Row;
    use crate::pipeline::resolver::tests::{FakeListing, entries};
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct KeyExtractor;

    #[async_trait]
    impl Extractor for KeyExtractor {
        async fn extract(&self, item: &WorkItem) -> Result<RawRecord> {
            Ok(RawRecord::new(&item.url).with("id", &item.key))
        }
    }

    struct RowNormalizer;

    impl Normalizer for RowNormalizer {
        type Output = Row;

        fn normalize(&self, raw: &RawRecord) -> Result<Row> {
            Ok(Row {
                id: raw.require("id")?.to_string(),
                value: 0,
            })
        }
    }

    fn policy() -> PersistPolicy {
        PersistPolicy::Batched {
            size: 2,
            prefix: "rows".into(),
        }
    }

    #[tokio::test]
    async fn test_harvest_with_partial_discovery() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let mut source =
            FakeListing::new(vec![entries(&["a", "b", "c"]), entries(&["d"])]).failing_at(1);
        let driver = ExtractionDriver::new(&KeyExtractor, RowNormalizer).with_progress(false);
        let mut report = RunReport::new("rows");

        let units = harvest(
            &mut source,
            &WorkListResolver::new(),
            &driver,
            &storage,
            policy(),
            &mut report,
        )
        .await
        .unwrap();

        assert_eq!(units, vec!["rows-1-2.csv", "rows-3-3.csv"]);
        assert_eq!(report.discovered, 3);
        assert_eq!(report.added, 3);
        assert!(report.discovery_error.is_some());
    }

    #[tokio::test]
    async fn test_harvest_fails_without_any_items() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let mut source = FakeListing::new(vec![entries(&["a"])]).failing_at(0);
        let driver = ExtractionDriver::new(&KeyExtractor, RowNormalizer).with_progress(false);
        let mut report = RunReport::new("rows");

        let result = harvest(
            &mut source,
            &WorkListResolver::new(),
            &driver,
            &storage,
            policy(),
            &mut report,
        )
        .await;

        assert!(matches!(result, Err(AppError::Discovery(_))));
        assert!(storage.list("rows-").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_is_saved() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        assert!(load_report(&storage).await.unwrap().is_none());

        let mut report = RunReport::new("wanted");
        report.added = 4;
        save_report(&storage, &report).await.unwrap();

        let loaded = load_report(&storage).await.unwrap().unwrap();
        assert_eq!(loaded.source, "wanted");
        assert_eq!(loaded.added, 4);
    }
}
