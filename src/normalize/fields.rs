// src/normalize/fields.rs

//! Single-field conversions from page text to typed values.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::Amount;

static HOURS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)h").expect("valid regex"));
static MINUTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)m").expect("valid regex"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));
static WINS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+wins?\b").expect("valid regex"));
static NOMINATIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s+nominations?\b").expect("valid regex"));
static RATING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*/\s*1[01]\s*(\d[\d.]*[MK]?)").expect("valid regex")
});

/// Award totals parsed from a summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Awards {
    pub wins: u32,
    pub nominations: u32,
}

/// Convert `"Xh Ym"` to total minutes.
///
/// Either component may be absent and counts as zero. A component that
/// occurs more than once is ignored. Values that do not fit in `u32`
/// are a schema violation of `field`.
pub fn parse_runtime(field: &str, text: &str) -> Result<u32> {
    let out_of_range = || AppError::schema(field, format!("runtime '{text}' out of range"));
    let component = |re: &Regex| -> Result<u32> {
        let values: Vec<&str> = re
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        match values.as_slice() {
            [value] => value.parse().map_err(|_| out_of_range()),
            _ => Ok(0),
        }
    };

    let hours = component(&HOURS)?;
    let minutes = component(&MINUTES)?;
    hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(minutes))
        .ok_or_else(out_of_range)
}

/// Convert a count such as `"1.2M"`, `"950K"` or `"500000"` to millions.
pub fn parse_count_millions(field: &str, text: &str) -> Result<f64> {
    let text = text.trim().replace(',', "");
    let invalid = || AppError::schema(field, format!("unrecognized count '{text}'"));

    let (number, divisor) = match text.chars().last() {
        Some('M') => (&text[..text.len() - 1], 1.0),
        Some('K') => (&text[..text.len() - 1], 1_000.0),
        Some(c) if c.is_ascii_digit() => (text.as_str(), 1_000_000.0),
        _ => return Err(invalid()),
    };

    let value: f64 = number.trim().parse().map_err(|_| invalid())?;
    Ok(value / divisor)
}

/// Convert a currency string to an integer amount.
///
/// All digit groups are concatenated, so `"$1,234,567 (estimated)"`
/// becomes 1234567. An absent value is [`Amount::Missing`].
pub fn parse_amount(field: &str, text: Option<&str>) -> Result<Amount> {
    let Some(text) = text else {
        return Ok(Amount::Missing);
    };

    let digits: String = DIGITS.find_iter(text).map(|m| m.as_str()).collect();
    if digits.is_empty() {
        return Err(AppError::schema(field, format!("no digits in '{text}'")));
    }

    digits
        .parse()
        .map(Amount::Reported)
        .map_err(|e| AppError::schema(field, e))
}

/// Count matched by `pattern`, 0 when absent.
///
/// The text must mention the count at most once.
pub fn count_matches(field: &str, pattern: &Regex, text: &str) -> Result<u32> {
    let matches: Vec<&str> = pattern
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    match matches.as_slice() {
        [] => Ok(0),
        [value] => value.parse().map_err(|e| AppError::schema(field, e)),
        _ => Err(AppError::AmbiguousCount {
            field: field.to_string(),
            matches: matches.len(),
        }),
    }
}

/// Parse `"2 wins & 5 nominations"`.
pub fn parse_awards(text: &str) -> Result<Awards> {
    Ok(Awards {
        wins: count_matches("awards_won", &WINS, text)?,
        nominations: count_matches("awards_nominated", &NOMINATIONS, text)?,
    })
}

/// Parse a rating block such as `"IMDb RATING 8.5/10 1.2M"`.
///
/// Returns the rating and the number of ratings in millions. Ratings
/// out of 11 are accepted too.
pub fn parse_rating_block(field: &str, text: &str) -> Result<(f64, f64)> {
    let caps = RATING
        .captures(text)
        .ok_or_else(|| AppError::schema(field, format!("no rating in '{}'", text.trim())))?;

    let rating: f64 = caps[1].parse().map_err(|e| AppError::schema(field, e))?;
    let reviews = parse_count_millions(field, &caps[2])?;
    Ok((rating, reviews))
}

/// Parse a four-digit year.
pub fn parse_year(field: &str, text: &str) -> Result<i32> {
    text.trim()
        .parse()
        .map_err(|_| AppError::schema(field, format!("invalid year '{}'", text.trim())))
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every occurrence of the given characters.
pub fn strip_chars(s: &str, remove: &[char]) -> String {
    s.chars().filter(|c| !remove.contains(c)).collect()
}

/// Uppercase the first letter of every word, lowercase the rest.
///
/// A word starts after any non-alphabetic character, so
/// `"O'NEIL"` becomes `"O'Neil"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_runtime() {
        assert_eq!(parse_runtime("runtime", "2h 15m").unwrap(), 135);
        assert_eq!(parse_runtime("runtime", "45m").unwrap(), 45);
        assert_eq!(parse_runtime("runtime", "3h").unwrap(), 180);
        assert_eq!(parse_runtime("runtime", "").unwrap(), 0);
    }

    #[test]
    fn test_runtime_repeated_component_ignored() {
        assert_eq!(parse_runtime("runtime", "1h 2h 10m").unwrap(), 10);
    }

    #[test]
    fn test_runtime_overflow_is_violation() {
        assert!(matches!(
            parse_runtime("runtime", "99999999h 5m"),
            Err(AppError::SchemaViolation { .. })
        ));
        assert!(matches!(
            parse_runtime("runtime", "99999999999m"),
            Err(AppError::SchemaViolation { .. })
        ));
    }

    #[test]
    fn test_count_millions() {
        assert!(approx(parse_count_millions("n", "1.2M").unwrap(), 1.2));
        assert!(approx(parse_count_millions("n", "950K").unwrap(), 0.95));
        assert!(approx(parse_count_millions("n", "500000").unwrap(), 0.5));
        assert!(approx(parse_count_millions("n", " 2.9M ").unwrap(), 2.9));
    }

    #[test]
    fn test_count_millions_rejects_garbage() {
        assert!(matches!(
            parse_count_millions("n_reviews", "lots"),
            Err(AppError::SchemaViolation { .. })
        ));
        assert!(parse_count_millions("n_reviews", "").is_err());
    }

    #[test]
    fn test_amount() {
        assert_eq!(
            parse_amount("budget", Some("$1,234,567")).unwrap(),
            Amount::Reported(1_234_567)
        );
        assert_eq!(
            parse_amount("budget", Some("Budget$25,000,000 (estimated)")).unwrap(),
            Amount::Reported(25_000_000)
        );
        assert_eq!(parse_amount("budget", Some("$0")).unwrap(), Amount::Reported(0));
        assert_eq!(parse_amount("budget", None).unwrap(), Amount::Missing);
    }

    #[test]
    fn test_missing_amount_distinct_from_zero() {
        let missing = parse_amount("gross", None).unwrap();
        let zero = parse_amount("gross", Some("$0")).unwrap();
        assert_eq!(missing.value(), zero.value());
        assert_ne!(missing, zero);
    }

    #[test]
    fn test_amount_without_digits_is_violation() {
        assert!(parse_amount("gross", Some("N/A")).is_err());
    }

    #[test]
    fn test_awards() {
        assert_eq!(
            parse_awards("2 wins & 5 nominations").unwrap(),
            Awards {
                wins: 2,
                nominations: 5
            }
        );
        assert_eq!(parse_awards("").unwrap(), Awards::default());
        assert_eq!(
            parse_awards("Won 1 Oscar. 1 win & 1 nomination total").unwrap(),
            Awards {
                wins: 1,
                nominations: 1
            }
        );
    }

    #[test]
    fn test_awards_ambiguous() {
        match parse_awards("2 wins & 5 nominations, 3 wins overall") {
            Err(AppError::AmbiguousCount { field, matches }) => {
                assert_eq!(field, "awards_won");
                assert_eq!(matches, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_rating_block() {
        let (rating, reviews) = parse_rating_block("rating", "IMDb RATING 9.3/10 2.9M").unwrap();
        assert!(approx(rating, 9.3));
        assert!(approx(reviews, 2.9));

        let (rating, reviews) = parse_rating_block("rating", "8.0/11150K").unwrap();
        assert!(approx(rating, 8.0));
        assert!(approx(reviews, 0.15));

        assert!(parse_rating_block("rating", "not rated").is_err());
    }

    #[test]
    fn test_year() {
        assert_eq!(parse_year("year", " 1994 ").unwrap(), 1994);
        assert!(parse_year("year", "TV Movie").is_err());
    }

    #[test]
    fn test_text_helpers() {
        assert_eq!(normalize_whitespace("  a \n b\tc "), "a b c");
        assert_eq!(strip_chars("a,b;\tc\u{a0}", &[',', ';', '\t', '\u{a0}']), "abc");
        assert_eq!(title_case("JAN VAN DER BERG"), "Jan Van Der Berg");
        assert_eq!(title_case("o'neil-smith"), "O'Neil-Smith");
    }
}
