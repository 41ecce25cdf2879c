// src/pipeline/driver.rs

//! Per-item fetch, extract, normalize and persist loop.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AssetFailure, AssetRef, ItemFailure, RawRecord, Record, RunReport, WorkItem};
use crate::normalize::Normalizer;
use crate::pipeline::ledger::DedupLedger;
use crate::pipeline::persist::Persister;
use crate::utils::log;

/// Fetches one detail page and extracts its raw fields.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, item: &WorkItem) -> Result<RawRecord>;
}

/// Best-effort download of a record's binary asset.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, asset: &AssetRef) -> Result<()>;
}

/// Drives work items through extraction, strictly one at a time.
pub struct ExtractionDriver<'a, N: Normalizer> {
    extractor: &'a dyn Extractor,
    normalizer: N,
    assets: Option<&'a dyn AssetFetcher>,
    delay: Duration,
    show_progress: bool,
}

impl<'a, N: Normalizer> ExtractionDriver<'a, N> {
    pub fn new(extractor: &'a dyn Extractor, normalizer: N) -> Self {
        Self {
            extractor,
            normalizer,
            assets: None,
            delay: Duration::ZERO,
            show_progress: true,
        }
    }

    /// Download each record's asset after it is accepted.
    pub fn with_assets(mut self, assets: &'a dyn AssetFetcher) -> Self {
        self.assets = Some(assets);
        self
    }

    /// Pause between fetches.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Process `items` in order, recording per-item failures in `report`.
    ///
    /// Errors that are not [`item errors`](crate::error::AppError::is_item_error)
    /// abort the run.
    pub async fn run(
        &self,
        items: &[WorkItem],
        ledger: &mut DedupLedger,
        persister: &mut Persister<'_, N::Output>,
        report: &mut RunReport,
    ) -> Result<()> {
        let total = items.len();

        for item in items {
            if ledger.contains(&item.key) || persister.is_pending(&item.key) {
                report.skipped += 1;
                ::log::debug!("Skipping {} (already stored)", item.key);
                continue;
            }

            match self.process(item).await {
                Ok(record) if ledger.contains(record.key()) || persister.is_pending(record.key()) => {
                    report.skipped += 1;
                    ::log::debug!("Skipping {} (record key already stored)", record.key());
                }
                Ok(record) if Self::is_known_entity(&record, ledger, persister) => {
                    report.skipped += 1;
                    ::log::debug!(
                        "Skipping {} (same entity stored as {})",
                        record.key(),
                        record.natural_key().unwrap_or_default()
                    );
                }
                Ok(record) => {
                    if self.show_progress {
                        log::progress(record.label(), item.position, total);
                    }
                    let asset = record.asset();
                    let label = record.label().to_string();

                    persister.append(record, ledger).await?;
                    report.added += 1;

                    if let (Some(fetcher), Some(asset)) = (self.assets, asset) {
                        if let Err(e) = fetcher.fetch(&asset).await {
                            ::log::warn!("Asset download failed for {}: {}", label, e);
                            report.asset_failures.push(AssetFailure {
                                label,
                                key: asset.key,
                                url: asset.url,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
                Err(e) if !e.is_item_error() => return Err(e),
                Err(e) => {
                    ::log::warn!("Failed {} ({}): {}", item.key, item.url, e);
                    report.failures.push(ItemFailure {
                        key: item.key.clone(),
                        url: item.url.clone(),
                        reason: e.to_string(),
                    });
                }
            }

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        Ok(())
    }

    fn is_known_entity(
        record: &N::Output,
        ledger: &DedupLedger,
        persister: &Persister<'_, N::Output>,
    ) -> bool {
        record
            .natural_key()
            .is_some_and(|k| ledger.contains_natural(k) || persister.is_pending_natural(k))
    }

    async fn process(&self, item: &WorkItem) -> Result<N::Output> {
        let raw = self.extractor.extract(item).await?;
        self.normalizer.normalize(&raw)
    }
}
