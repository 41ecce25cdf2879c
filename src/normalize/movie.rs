//! Movie normalization rules.

use crate::error::Result;
use crate::models::{Movie, RawRecord};
use crate::normalize::Normalizer;
use crate::normalize::fields::{
    normalize_whitespace, parse_amount, parse_awards, parse_rating_block, parse_runtime,
    parse_year,
};

/// Raw field names filled in by the movie extractor.
pub mod field {
    pub const IMDB_ID: &str = "imdb_id";
    pub const TITLE: &str = "title";
    pub const YEAR: &str = "year";
    pub const CERTIFICATE: &str = "certificate";
    pub const RUNTIME: &str = "runtime";
    pub const RATING_BLOCK: &str = "rating_block";
    pub const DIRECTOR: &str = "director";
    pub const GENRE: &str = "genre";
    pub const COUNTRY: &str = "country";
    pub const BUDGET: &str = "budget";
    pub const GROSS: &str = "gross";
    pub const AWARDS: &str = "awards";
}

/// Certificate written when the page shows none.
pub const NO_CERTIFICATE: &str = "None";

/// Builds [`Movie`] records from title-page extractions.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovieNormalizer;

impl Normalizer for MovieNormalizer {
    type Output = Movie;

    fn normalize(&self, raw: &RawRecord) -> Result<Movie> {
        let (imdb_rating, n_reviews_mil) =
            parse_rating_block(field::RATING_BLOCK, raw.require(field::RATING_BLOCK)?)?;

        // Award line is absent for titles without awards.
        let awards = parse_awards(raw.get_or(field::AWARDS, ""))?;

        Ok(Movie {
            imdb_id: raw.require(field::IMDB_ID)?.to_string(),
            title: normalize_whitespace(raw.require(field::TITLE)?),
            year: parse_year(field::YEAR, raw.require(field::YEAR)?)?,
            age_restriction: raw.get_or(field::CERTIFICATE, NO_CERTIFICATE).to_string(),
            runtime_min: parse_runtime(field::RUNTIME, raw.require(field::RUNTIME)?)?,
            imdb_rating,
            n_reviews_mil,
            director: normalize_whitespace(raw.require(field::DIRECTOR)?),
            genre: normalize_whitespace(raw.require(field::GENRE)?),
            country: normalize_whitespace(raw.require(field::COUNTRY)?),
            budget: parse_amount(field::BUDGET, raw.get(field::BUDGET))?,
            gross: parse_amount(field::GROSS, raw.get(field::GROSS))?,
            awards_won: awards.wins,
            awards_nominated: awards.nominations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Amount;

    fn raw() -> RawRecord {
        RawRecord::new("https://www.imdb.com/title/tt0111161/")
            .with(field::IMDB_ID, "tt0111161")
            .with(field::TITLE, " The Shawshank  Redemption ")
            .with(field::YEAR, "1994")
            .with(field::CERTIFICATE, "R")
            .with(field::RUNTIME, "2h 22m")
            .with(field::RATING_BLOCK, "IMDb RATING 9.3/10 2.9M")
            .with(field::DIRECTOR, "Frank Darabont")
            .with(field::GENRE, "Drama")
            .with(field::COUNTRY, "United States")
            .with(field::BUDGET, "$25,000,000 (estimated)")
            .with(field::GROSS, "$29,332,133")
            .with(field::AWARDS, "21 wins & 42 nominations total")
    }

    #[test]
    fn test_full_record() {
        let movie = MovieNormalizer.normalize(&raw()).unwrap();
        assert_eq!(movie.imdb_id, "tt0111161");
        assert_eq!(movie.title, "The Shawshank Redemption");
        assert_eq!(movie.year, 1994);
        assert_eq!(movie.age_restriction, "R");
        assert_eq!(movie.runtime_min, 142);
        assert!((movie.imdb_rating - 9.3).abs() < 1e-9);
        assert!((movie.n_reviews_mil - 2.9).abs() < 1e-9);
        assert_eq!(movie.budget, Amount::Reported(25_000_000));
        assert_eq!(movie.gross, Amount::Reported(29_332_133));
        assert_eq!(movie.awards_won, 21);
        assert_eq!(movie.awards_nominated, 42);
    }

    #[test]
    fn test_optional_fields_default() {
        let mut raw = raw();
        raw.insert(field::CERTIFICATE, "");
        raw.insert(field::BUDGET, "");
        raw.insert(field::GROSS, "");
        raw.insert(field::AWARDS, "");

        let movie = MovieNormalizer.normalize(&raw).unwrap();
        assert_eq!(movie.age_restriction, NO_CERTIFICATE);
        assert_eq!(movie.budget, Amount::Missing);
        assert_eq!(movie.gross, Amount::Missing);
        assert_eq!(movie.awards_won, 0);
        assert_eq!(movie.awards_nominated, 0);
    }

    #[test]
    fn test_missing_required_field() {
        let mut raw = raw();
        raw.insert(field::DIRECTOR, "  ");
        match MovieNormalizer.normalize(&raw) {
            Err(AppError::SchemaViolation { field, .. }) => assert_eq!(field, "director"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_ambiguous_awards_fail_record() {
        let mut raw = raw();
        raw.insert(field::AWARDS, "2 wins & 5 nominations. 4 wins");
        assert!(matches!(
            MovieNormalizer.normalize(&raw),
            Err(AppError::AmbiguousCount { .. })
        ));
    }

    #[test]
    fn test_oversized_runtime_fails_record() {
        let mut raw = raw();
        raw.insert(field::RUNTIME, "99999999h 5m");
        match MovieNormalizer.normalize(&raw) {
            Err(AppError::SchemaViolation { field, .. }) => assert_eq!(field, "runtime"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
