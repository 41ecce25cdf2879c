// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &CrawlerConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page body, treating non-success statuses as errors.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::fetch(url, e))?;
    let response = response
        .error_for_status()
        .map_err(|e| AppError::fetch(url, e))?;
    response.text().await.map_err(|e| AppError::fetch(url, e))
}

/// Fetch raw bytes, treating non-success statuses as errors.
pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::fetch(url, e))?
        .error_for_status()
        .map_err(|e| AppError::fetch(url, e))?;
    let bytes = response.bytes().await.map_err(|e| AppError::fetch(url, e))?;
    Ok(bytes.to_vec())
}
