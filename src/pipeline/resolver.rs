// src/pipeline/resolver.rs

//! Work-list discovery over a paginated listing.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::WorkItem;

/// A listing entry before it is ordered into a [`WorkItem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovered {
    pub key: String,
    pub url: String,
}

impl Discovered {
    pub fn new(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
        }
    }
}

/// A paginated discovery source.
#[async_trait]
pub trait ListingSource: Send {
    /// Fetch the next page of entries, `None` once the listing is exhausted.
    async fn next_page(&mut self) -> Result<Option<Vec<Discovered>>>;
}

/// Work items from one discovery pass.
#[derive(Debug)]
pub struct Resolution {
    /// Deduplicated items in discovery order
    pub items: Vec<WorkItem>,

    /// Set when discovery stopped on a failed page
    pub error: Option<AppError>,
}

impl Resolution {
    /// Items, or the discovery error when nothing was resolved.
    pub fn into_items(self) -> Result<(Vec<WorkItem>, Option<AppError>)> {
        match self.error {
            Some(error) if self.items.is_empty() => Err(error),
            error => Ok((self.items, error)),
        }
    }
}

/// Produces the ordered, duplicate-free work list.
#[derive(Debug, Clone, Default)]
pub struct WorkListResolver {
    limit: Option<usize>,
}

impl WorkListResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after `limit` items.
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit) }
    }

    /// Walk the listing until it is exhausted or a page adds nothing new.
    ///
    /// A failed page ends discovery; items resolved before it are kept.
    pub async fn resolve(&self, source: &mut dyn ListingSource) -> Resolution {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        let mut pages = 0usize;

        let error = loop {
            if self.limit.is_some_and(|limit| items.len() >= limit) {
                break None;
            }

            let page = match source.next_page().await {
                Ok(Some(page)) => page,
                Ok(None) => break None,
                Err(e) => {
                    log::warn!("Discovery stopped after {} pages: {}", pages, e);
                    break Some(match e {
                        AppError::Discovery(_) => e,
                        other => AppError::discovery(other),
                    });
                }
            };
            pages += 1;

            let before = items.len();
            for entry in page {
                if self.limit.is_some_and(|limit| items.len() >= limit) {
                    break;
                }
                if seen.insert(entry.key.clone()) {
                    items.push(WorkItem {
                        key: entry.key,
                        url: entry.url,
                        position: items.len() + 1,
                    });
                }
            }

            log::debug!(
                "Listing page {}: {} new items ({} total)",
                pages,
                items.len() - before,
                items.len()
            );

            if items.len() == before {
                break None;
            }
        };

        Resolution { items, error }
    }
}
