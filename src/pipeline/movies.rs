// src/pipeline/movies.rs

//! Movie ranking pipeline.

use std::time::Duration;

use reqwest::Client;

use crate::error::Result;
use crate::models::{Config, RunReport};
use crate::normalize::MovieNormalizer;
use crate::pipeline::{
    ExtractionDriver, PersistPolicy, WorkListResolver, combine_units, harvest, list_units,
};
use crate::services::{MovieExtractor, MovieListing};
use crate::storage::LocalStorage;
use crate::utils::log;

/// Run the movie harvest, writing one unit per batch.
pub async fn run_movies(
    config: &Config,
    storage: &LocalStorage,
    client: &Client,
) -> Result<RunReport> {
    let source = &config.movies;
    log::header("Harvesting ranked movies");

    let mut listing = MovieListing::new(client.clone(), source)?;
    let extractor = MovieExtractor::new(client.clone(), &source.selectors)?;
    let driver = ExtractionDriver::new(&extractor, MovieNormalizer)
        .with_delay(Duration::from_millis(config.crawler.request_delay_ms))
        .with_progress(config.logging.show_progress);
    let policy = PersistPolicy::Batched {
        size: source.batch_size,
        prefix: source.unit_prefix.clone(),
    };

    let mut report = RunReport::new("movies");
    let units = harvest(
        &mut listing,
        &WorkListResolver::with_limit(source.max_items),
        &driver,
        storage,
        policy,
        &mut report,
    )
    .await?;

    for unit in &units {
        log::sub_item(&format!("Wrote {}", unit));
    }
    Ok(report)
}

/// Merge every movie unit into the combined file.
///
/// Returns the number of units merged.
pub async fn combine_movies(config: &Config, storage: &LocalStorage) -> Result<usize> {
    let source = &config.movies;
    let units = list_units(storage, &source.unit_prefix).await?;
    log::step(
        1,
        1,
        &format!("Combining {} units into {}", units.len(), source.combined_file),
    );
    combine_units(storage, &source.unit_prefix, &source.combined_file).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecordStore;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_combine_movies_uses_configured_names() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());
        let config = Config::default();
        storage
            .write_bytes("imdb-top-movies-101-101.csv", b"imdb_id\ntt2\n")
            .await
            .unwrap();
        storage
            .write_bytes("imdb-top-movies-1-1.csv", b"imdb_id\ntt1\n")
            .await
            .unwrap();

        assert_eq!(combine_movies(&config, &storage).await.unwrap(), 2);
        let combined = storage.read_bytes("imdb-top-movies.csv").await.unwrap();
        assert_eq!(combined.as_deref(), Some(&b"imdb_id\ntt1\ntt2\n"[..]));
    }
}
