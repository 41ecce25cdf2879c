//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Console output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Movie ranking source
    #[serde(default)]
    pub movies: MovieSourceConfig,

    /// Wanted-persons source
    #[serde(default)]
    pub wanted: WantedSourceConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.movies.batch_size == 0 {
            return Err(AppError::validation("movies.batch_size must be > 0"));
        }
        if self.movies.page_size == 0 {
            return Err(AppError::validation("movies.page_size must be > 0"));
        }
        if !self.movies.listing_url.contains("{start}") {
            return Err(AppError::validation(
                "movies.listing_url must contain a {start} placeholder",
            ));
        }
        if self.movies.unit_prefix.trim().is_empty() {
            return Err(AppError::validation("movies.unit_prefix is empty"));
        }
        if self.wanted.ledger_file.trim().is_empty() {
            return Err(AppError::validation("wanted.ledger_file is empty"));
        }
        url::Url::parse(&self.wanted.base_url)?;
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between item fetches in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Console output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Print a progress line for every processed item
    #[serde(default = "defaults::show_progress")]
    pub show_progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            show_progress: defaults::show_progress(),
        }
    }
}

/// Settings for the paginated movie ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSourceConfig {
    /// Listing URL template with `{start}` and `{count}` placeholders
    #[serde(default = "defaults::movie_listing_url")]
    pub listing_url: String,

    /// Titles requested per listing page
    #[serde(default = "defaults::movie_page_size")]
    pub page_size: usize,

    /// Stop discovery after this many titles
    #[serde(default = "defaults::movie_max_items")]
    pub max_items: usize,

    /// Records per durable unit
    #[serde(default = "defaults::movie_batch_size")]
    pub batch_size: usize,

    /// File name prefix of each unit (`{prefix}-{start}-{end}.csv`)
    #[serde(default = "defaults::movie_unit_prefix")]
    pub unit_prefix: String,

    /// Output of the combine step
    #[serde(default = "defaults::movie_combined_file")]
    pub combined_file: String,

    #[serde(default)]
    pub selectors: MovieSelectors,
}

impl Default for MovieSourceConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::movie_listing_url(),
            page_size: defaults::movie_page_size(),
            max_items: defaults::movie_max_items(),
            batch_size: defaults::movie_batch_size(),
            unit_prefix: defaults::movie_unit_prefix(),
            combined_file: defaults::movie_combined_file(),
            selectors: MovieSelectors::default(),
        }
    }
}

impl MovieSourceConfig {
    /// Build the listing URL for a page starting at the 1-based `start`.
    pub fn page_url(&self, start: usize) -> String {
        self.listing_url
            .replace("{start}", &start.to_string())
            .replace("{count}", &self.page_size.to_string())
    }
}

/// CSS selectors for the movie listing and title pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieSelectors {
    /// Title links on a listing page
    pub listing_link: String,
    pub title: String,
    /// Items of the year / certificate / runtime line under the title
    pub subheading_item: String,
    pub rating_block: String,
    pub principal_credit: String,
    pub genres: String,
    pub origin: String,
    pub budget: String,
    pub gross: String,
    pub awards: String,
}

impl Default for MovieSelectors {
    fn default() -> Self {
        Self {
            listing_link: "a.ipc-title-link-wrapper".to_string(),
            title: "span.hero__primary-text".to_string(),
            subheading_item: "h1[data-testid='hero__pageTitle'] ~ ul > li".to_string(),
            rating_block: "[data-testid='hero-rating-bar__aggregate-rating']".to_string(),
            principal_credit: "[data-testid='title-pc-principal-credit']".to_string(),
            genres: "[data-testid='storyline-genres'] a".to_string(),
            origin: "[data-testid='title-details-origin'] a".to_string(),
            budget: "[data-testid='title-boxoffice-budget']".to_string(),
            gross: "[data-testid='title-boxoffice-cumulativeworldwidegross']".to_string(),
            awards: "[data-testid='award_information']".to_string(),
        }
    }
}

/// Settings for the wanted-persons listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WantedSourceConfig {
    /// Base URL that list and detail links are relative to
    #[serde(default = "defaults::wanted_base_url")]
    pub base_url: String,

    /// Listing page, relative to `base_url`
    #[serde(default = "defaults::wanted_list_page")]
    pub list_page: String,

    /// Growing CSV ledger, relative to the storage directory
    #[serde(default = "defaults::wanted_ledger_file")]
    pub ledger_file: String,

    /// Directory for mugshots, relative to the storage directory
    #[serde(default = "defaults::wanted_photo_dir")]
    pub photo_dir: String,

    /// Particles that belong to the family name
    #[serde(default = "defaults::surname_prefixes")]
    pub surname_prefixes: Vec<String>,

    /// Alias values that mean "no alias"
    #[serde(default = "defaults::alias_placeholders")]
    pub alias_placeholders: Vec<String>,

    #[serde(default)]
    pub selectors: WantedSelectors,
}

impl Default for WantedSourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::wanted_base_url(),
            list_page: defaults::wanted_list_page(),
            ledger_file: defaults::wanted_ledger_file(),
            photo_dir: defaults::wanted_photo_dir(),
            surname_prefixes: defaults::surname_prefixes(),
            alias_placeholders: defaults::alias_placeholders(),
            selectors: WantedSelectors::default(),
        }
    }
}

/// CSS selectors for the wanted listing and detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WantedSelectors {
    pub listing_link: String,
    pub name: String,
    pub detail_table: String,
    pub status_blue: String,
    pub status_red: String,
    /// Paragraphs describing the circumstances, inside the detail table
    pub circumstance: String,
}

impl Default for WantedSelectors {
    fn default() -> Self {
        Self {
            listing_link: ".cust-td-border a".to_string(),
            name: ".panel-body > h2".to_string(),
            detail_table: ".panel-body table".to_string(),
            status_blue: ".panel-body font[color='blue']".to_string(),
            status_red: ".panel-body font[color='red']".to_string(),
            circumstance: "tr:nth-child(2) > td:nth-child(2) > p".to_string(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; harvest/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        500
    }
    pub fn show_progress() -> bool {
        true
    }

    // Movie defaults
    pub fn movie_listing_url() -> String {
        "https://www.imdb.com/search/title/?groups=top_1000&sort=user_rating,desc&count={count}&start={start}"
            .into()
    }
    pub fn movie_page_size() -> usize {
        100
    }
    pub fn movie_max_items() -> usize {
        1000
    }
    pub fn movie_batch_size() -> usize {
        100
    }
    pub fn movie_unit_prefix() -> String {
        "imdb-top-movies".into()
    }
    pub fn movie_combined_file() -> String {
        "imdb-top-movies.csv".into()
    }

    // Wanted defaults
    pub fn wanted_base_url() -> String {
        "https://www.saps.gov.za/crimestop/wanted/".into()
    }
    pub fn wanted_list_page() -> String {
        "list.php".into()
    }
    pub fn wanted_ledger_file() -> String {
        "wanted_list.csv".into()
    }
    pub fn wanted_photo_dir() -> String {
        "photos".into()
    }
    pub fn surname_prefixes() -> Vec<String> {
        ["Du", "Le", "De", "Der", "Den", "Van", "Jansen"]
            .into_iter()
            .map(String::from)
            .collect()
    }
    pub fn alias_placeholders() -> Vec<String> {
        ["0", "Unknown", "Unkown", "n/a", "N/A"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}
