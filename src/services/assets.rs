// src/services/assets.rs

//! Write-once download of record assets.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::AssetRef;
use crate::pipeline::AssetFetcher;
use crate::storage::RecordStore;
use crate::utils::http;

/// Downloads assets into a [`RecordStore`], keeping files already present.
pub struct AssetDownloader<'a> {
    client: Client,
    store: &'a dyn RecordStore,
}

impl<'a> AssetDownloader<'a> {
    pub fn new(client: Client, store: &'a dyn RecordStore) -> Self {
        Self { client, store }
    }
}

#[async_trait]
impl AssetFetcher for AssetDownloader<'_> {
    async fn fetch(&self, asset: &AssetRef) -> Result<()> {
        if self.store.exists(&asset.key).await? {
            log::debug!("Asset {} already stored", asset.key);
            return Ok(());
        }

        let bytes = http::fetch_bytes(&self.client, &asset.url)
            .await
            .map_err(|e| AppError::asset(&asset.key, &asset.url, e))?;
        self.store
            .write_bytes(&asset.key, &bytes)
            .await
            .map_err(|e| AppError::asset(&asset.key, &asset.url, e))
    }
}
