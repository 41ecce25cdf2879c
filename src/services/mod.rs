//! Service layer for the harvest pipeline.
//!
//! This module contains the page-facing code for:
//! - The ranked movie listing and title pages (`MovieListing`, `MovieExtractor`)
//! - The wanted-persons listing and detail pages (`WantedListing`, `WantedExtractor`)
//! - Mugshot downloads (`AssetDownloader`)

mod assets;
mod movies;
mod wanted;

pub use assets::AssetDownloader;
pub use movies::{MovieExtractor, MovieListing};
pub use wanted::{WantedExtractor, WantedListing};

use scraper::{ElementRef, Selector};

use crate::error::{AppError, Result};

/// Parse a configured CSS selector.
pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// All text below `element`, text nodes separated by a space.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(
            parse_selector("div[["),
            Err(AppError::Selector { .. })
        ));
    }

    #[test]
    fn test_element_text_joins_nodes() {
        let doc = Html::parse_fragment("<p> IMDb RATING <span>9.3</span>/10 <b>2.9M</b></p>");
        let p = doc.select(&parse_selector("p").unwrap()).next().unwrap();
        assert_eq!(element_text(&p), "IMDb RATING 9.3 /10 2.9M");
    }
}
