//! Wanted-person normalization rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::{RawRecord, WantedPerson, WantedSourceConfig};
use crate::normalize::Normalizer;
use crate::normalize::fields::{normalize_whitespace, strip_chars, title_case};
use crate::normalize::names::split_name;

static TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static CASE_NO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[/-]\d{1,2}[/-]\d{4}").expect("valid regex"));
static WARRANT_NO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}/W/\d+").expect("valid regex"));

/// Characters dropped from the circumstances text.
const CIRCUMSTANCE_NOISE: &[char] = &['\r', '\n', '\t', '\u{a0}', ',', ';'];

/// Raw field names filled in by the wanted extractor.
///
/// Table rows are stored under their on-page label.
pub mod field {
    pub const FULL_NAME: &str = "full_name";
    /// Inner HTML of the table cell holding the mugshot
    pub const MUGSHOT_CELL: &str = "mugshot_cell";
    pub const IMG_URL: &str = "img_url";
    /// Status badges, comma separated
    pub const STATUS: &str = "status";
    pub const CIRCUMSTANCE: &str = "crime_circumstance";
    pub const SCRAPED_AT: &str = "scraped_at";

    pub const CRIME: &str = "Crime";
    pub const CRIME_DATE: &str = "Crime Date";
    pub const GENDER: &str = "Gender";
    pub const STATION: &str = "Station";
    pub const CASE_NUMBER: &str = "Case Number";
    pub const OFFICER: &str = "Investigating Officer";
    pub const ALIASES: &str = "Aliases";
}

/// Builds [`WantedPerson`] records from detail-page extractions.
#[derive(Debug, Clone)]
pub struct WantedNormalizer {
    surname_prefixes: Vec<String>,
    alias_placeholders: Vec<String>,
    photo_dir: String,
}

impl WantedNormalizer {
    pub fn new(config: &WantedSourceConfig) -> Self {
        Self {
            surname_prefixes: config.surname_prefixes.clone(),
            alias_placeholders: config.alias_placeholders.clone(),
            photo_dir: config.photo_dir.trim_end_matches('/').to_string(),
        }
    }

    fn alias(&self, raw: &RawRecord) -> String {
        match raw.get(field::ALIASES) {
            Some(alias) if !self.alias_placeholders.iter().any(|p| p == alias) => {
                alias.to_string()
            }
            _ => String::new(),
        }
    }
}

impl Normalizer for WantedNormalizer {
    type Output = WantedPerson;

    fn normalize(&self, raw: &RawRecord) -> Result<WantedPerson> {
        let full_name = title_case(&normalize_whitespace(raw.require(field::FULL_NAME)?));
        let name = split_name(&full_name, &self.surname_prefixes);

        let npis = parse_npis(raw.require(field::MUGSHOT_CELL)?)?;
        let (station, province) = split_station(raw.require(field::STATION)?);
        let case_text = raw.require(field::CASE_NUMBER)?;

        let status = normalize_whitespace(raw.get_or(field::STATUS, ""));

        Ok(WantedPerson {
            first_name: name.first,
            middle_names: name.middle,
            last_name: name.last,
            status,
            img_url: raw.get_or(field::IMG_URL, "").to_string(),
            photo_key: Some(format!("{}/{}.jpg", self.photo_dir, npis)),
            npis,
            crime: raw.require(field::CRIME)?.to_string(),
            crime_circumstance: strip_chars(
                raw.get_or(field::CIRCUMSTANCE, ""),
                CIRCUMSTANCE_NOISE,
            ),
            crime_date: raw.require(field::CRIME_DATE)?.to_string(),
            alias: self.alias(raw),
            gender: raw.require(field::GENDER)?.to_string(),
            station,
            province,
            case_no: join_matches(&CASE_NO, case_text),
            warrant_no: join_matches(&WARRANT_NO, case_text),
            io: raw.require(field::OFFICER)?.to_string(),
            date_scraped: raw.get_or(field::SCRAPED_AT, "").to_string(),
            url: raw.source.clone(),
        })
    }
}

/// Identifier printed next to the mugshot, with `/` replaced by `-`.
pub fn parse_npis(cell_html: &str) -> Result<String> {
    let after_image = cell_html
        .split_once("<img")
        .and_then(|(_, rest)| rest.split_once('>'))
        .map_or(cell_html, |(_, rest)| rest);

    let text = TAGS.replace_all(after_image, " ");
    text.split_whitespace()
        .next()
        .map(|token| token.replace('/', "-"))
        .ok_or_else(|| AppError::schema("npis", "no identifier next to mugshot"))
}

/// Split `"Station (Province)"`; the province is empty without parentheses.
pub fn split_station(text: &str) -> (String, String) {
    match text.split_once(" (") {
        Some((station, rest)) => {
            let province = rest.split(')').next().unwrap_or_default();
            (station.trim().to_string(), province.trim().to_string())
        }
        None => (text.trim().to_string(), String::new()),
    }
}

fn join_matches(pattern: &Regex, text: &str) -> String {
    pattern
        .find_iter(text)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
