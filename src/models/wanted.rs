//! Wanted-person record schema.

use serde::{Deserialize, Serialize};

use crate::models::{AssetRef, Record};

/// One entry of the wanted-persons ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WantedPerson {
    pub first_name: String,
    pub middle_names: String,
    pub last_name: String,
    /// Status badges, e.g. "Wanted, Armed and dangerous"
    pub status: String,
    pub img_url: String,
    /// Police identifier with `/` replaced by `-`
    pub npis: String,
    pub crime: String,
    pub crime_circumstance: String,
    pub crime_date: String,
    pub alias: String,
    pub gender: String,
    pub station: String,
    pub province: String,
    pub case_no: String,
    pub warrant_no: String,
    /// Investigating officer
    pub io: String,
    pub date_scraped: String,
    /// Detail page, the ledger key
    pub url: String,

    #[serde(skip)]
    pub photo_key: Option<String>,
}

impl WantedPerson {
    /// Full name as shown on the detail page.
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_names, &self.last_name]
            .into_iter()
            .filter(|s| !s.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Record for WantedPerson {
    const KEY_COLUMN: &'static str = "url";
    const NATURAL_KEY_COLUMN: Option<&'static str> = Some("npis");

    fn key(&self) -> &str {
        &self.url
    }

    fn natural_key(&self) -> Option<&str> {
        Some(self.npis.as_str()).filter(|npis| !npis.is_empty())
    }

    fn label(&self) -> &str {
        &self.npis
    }

    fn asset(&self) -> Option<AssetRef> {
        let key = self.photo_key.clone()?;
        if self.img_url.is_empty() {
            return None;
        }
        Some(AssetRef {
            key,
            url: self.img_url.clone(),
        })
    }
}
