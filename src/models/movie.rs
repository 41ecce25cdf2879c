//! Movie record schema.

use serde::{Deserialize, Serialize};

use crate::models::Record;

/// A monetary amount that may be missing from the page.
///
/// `Missing` reports the sentinel value 0 but stays distinct from a
/// reported zero; it is written as an empty CSV cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum Amount {
    #[default]
    Missing,
    Reported(u64),
}

impl Amount {
    /// Numeric value, 0 when missing.
    pub fn value(&self) -> u64 {
        match self {
            Amount::Missing => 0,
            Amount::Reported(v) => *v,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Amount::Missing)
    }
}

impl From<Option<u64>> for Amount {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Amount::Missing, Amount::Reported)
    }
}

impl From<Amount> for Option<u64> {
    fn from(amount: Amount) -> Self {
        match amount {
            Amount::Missing => None,
            Amount::Reported(v) => Some(v),
        }
    }
}

/// A title from the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Title identifier, e.g. `tt0111161`
    pub imdb_id: String,
    pub title: String,
    pub year: i32,
    /// Certificate, `"None"` when the page has none
    pub age_restriction: String,
    pub runtime_min: u32,
    pub imdb_rating: f64,
    /// Number of user ratings, in millions
    pub n_reviews_mil: f64,
    pub director: String,
    /// First listed genre
    pub genre: String,
    /// First listed country of origin
    pub country: String,
    pub budget: Amount,
    pub gross: Amount,
    pub awards_won: u32,
    pub awards_nominated: u32,
}

impl Record for Movie {
    const KEY_COLUMN: &'static str = "imdb_id";

    fn key(&self) -> &str {
        &self.imdb_id
    }

    fn label(&self) -> &str {
        &self.title
    }
}
