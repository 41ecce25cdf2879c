// src/pipeline/wanted.rs

//! Wanted-persons pipeline.

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::{Config, RunReport};
use crate::normalize::WantedNormalizer;
use crate::pipeline::{ExtractionDriver, PersistPolicy, WorkListResolver, harvest};
use crate::services::{AssetDownloader, WantedExtractor, WantedListing};
use crate::storage::LocalStorage;
use crate::utils::log;

/// Run the wanted-persons harvest, appending to the ledger file.
///
/// Mugshots are downloaded unless `skip_photos` is set.
pub async fn run_wanted(
    config: &Config,
    storage: &LocalStorage,
    client: &Client,
    skip_photos: bool,
) -> Result<RunReport> {
    let source = &config.wanted;
    log::header("Harvesting wanted persons");

    let mut listing = WantedListing::new(client.clone(), source)?;
    let extractor = WantedExtractor::new(client.clone(), source)?;
    let downloader = AssetDownloader::new(client.clone(), storage);

    let mut driver = ExtractionDriver::new(&extractor, WantedNormalizer::new(source))
        .with_delay(Duration::from_millis(config.crawler.request_delay_ms))
        .with_progress(config.logging.show_progress);
    if !skip_photos {
        driver = driver.with_assets(&downloader);
    }

    let policy = PersistPolicy::Append {
        file: source.ledger_file.clone(),
    };
    let mut report = RunReport::new("wanted");
    harvest(
        &mut listing,
        &WorkListResolver::new(),
        &driver,
        storage,
        policy,
        &mut report,
    )
    .await?;

    if report.asset_failures.is_empty() && report.added > 0 && !skip_photos {
        log::sub_item("All images downloaded successfully.");
    }
    Ok(report)
}
