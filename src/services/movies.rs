// src/services/movies.rs

//! Ranked movie listing and title-page extraction.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{MovieSelectors, MovieSourceConfig, RawRecord, WorkItem};
use crate::normalize::movie::field;
use crate::pipeline::{Discovered, Extractor, ListingSource};
use crate::services::{element_text, parse_selector};
use crate::utils::http;
use crate::utils::url::{imdb_title_id, imdb_title_url};

/// Walks the ranking with `start`/`count` pagination.
pub struct MovieListing {
    client: Client,
    config: MovieSourceConfig,
    link_sel: Selector,
    next_start: usize,
}

impl MovieListing {
    pub fn new(client: Client, config: &MovieSourceConfig) -> Result<Self> {
        Ok(Self {
            client,
            link_sel: parse_selector(&config.selectors.listing_link)?,
            config: config.clone(),
            next_start: 1,
        })
    }

    fn parse_page(&self, html: &str) -> Vec<Discovered> {
        let document = Html::parse_document(html);
        document
            .select(&self.link_sel)
            .filter_map(|link| link.value().attr("href"))
            .filter_map(imdb_title_id)
            .map(|id| Discovered::new(id, imdb_title_url(id)))
            .collect()
    }
}

#[async_trait]
impl ListingSource for MovieListing {
    async fn next_page(&mut self) -> Result<Option<Vec<Discovered>>> {
        if self.next_start > self.config.max_items {
            return Ok(None);
        }

        let url = self.config.page_url(self.next_start);
        log::debug!("Fetching listing page {}", url);
        let html = http::fetch_text(&self.client, &url).await?;

        self.next_start += self.config.page_size;
        Ok(Some(self.parse_page(&html)))
    }
}

/// Compiled title-page selectors.
struct TitleSelectors {
    title: Selector,
    subheading_item: Selector,
    link: Selector,
    rating_block: Selector,
    principal_credit: Selector,
    genres: Selector,
    origin: Selector,
    budget: Selector,
    gross: Selector,
    awards: Selector,
}

impl TitleSelectors {
    fn compile(s: &MovieSelectors) -> Result<Self> {
        Ok(Self {
            title: parse_selector(&s.title)?,
            subheading_item: parse_selector(&s.subheading_item)?,
            link: parse_selector("a")?,
            rating_block: parse_selector(&s.rating_block)?,
            principal_credit: parse_selector(&s.principal_credit)?,
            genres: parse_selector(&s.genres)?,
            origin: parse_selector(&s.origin)?,
            budget: parse_selector(&s.budget)?,
            gross: parse_selector(&s.gross)?,
            awards: parse_selector(&s.awards)?,
        })
    }
}

/// Fetches a title page and pulls out its raw fields.
pub struct MovieExtractor {
    client: Client,
    selectors: TitleSelectors,
}

impl MovieExtractor {
    pub fn new(client: Client, selectors: &MovieSelectors) -> Result<Self> {
        Ok(Self {
            client,
            selectors: TitleSelectors::compile(selectors)?,
        })
    }

    /// Extract fields from a fetched title page.
    pub fn parse_title_page(&self, item: &WorkItem, html: &str) -> Result<RawRecord> {
        let document = Html::parse_document(html);
        let sel = &self.selectors;
        let first_text = |selector: &Selector| {
            document
                .select(selector)
                .next()
                .map(|e| element_text(&e))
        };

        let mut raw = RawRecord::new(&item.url).with(field::IMDB_ID, &item.key);

        let title = first_text(&sel.title)
            .ok_or_else(|| AppError::schema(field::TITLE, "title element not found"))?;
        raw.insert(field::TITLE, title);

        // Year, then an optional linked certificate, then runtime.
        let items: Vec<_> = document.select(&sel.subheading_item).collect();
        if let Some(year) = items.first() {
            raw.insert(field::YEAR, element_text(year));
        }
        let certificate = items.get(1).and_then(|li| li.select(&sel.link).next());
        match (certificate, items.get(2)) {
            (Some(certificate), runtime) => {
                raw.insert(field::CERTIFICATE, element_text(&certificate));
                if let Some(runtime) = runtime {
                    raw.insert(field::RUNTIME, element_text(runtime));
                }
            }
            (None, _) => {
                if let Some(runtime) = items.get(1) {
                    raw.insert(field::RUNTIME, element_text(runtime));
                }
            }
        }

        if let Some(rating) = first_text(&sel.rating_block) {
            raw.insert(field::RATING_BLOCK, rating);
        }

        let director = document
            .select(&sel.principal_credit)
            .find(|credit| credit.text().any(|t| t.contains("Director")))
            .and_then(|credit| credit.select(&sel.link).next());
        if let Some(director) = director {
            raw.insert(field::DIRECTOR, element_text(&director));
        }

        for (name, selector) in [
            (field::GENRE, &sel.genres),
            (field::COUNTRY, &sel.origin),
            (field::BUDGET, &sel.budget),
            (field::GROSS, &sel.gross),
            (field::AWARDS, &sel.awards),
        ] {
            if let Some(text) = first_text(selector) {
                raw.insert(name, text);
            }
        }

        Ok(raw)
    }
}

#[async_trait]
impl Extractor for MovieExtractor {
    async fn extract(&self, item: &WorkItem) -> Result<RawRecord> {
        let html = http::fetch_text(&self.client, &item.url).await?;
        self.parse_title_page(item, &html)
    }
}
