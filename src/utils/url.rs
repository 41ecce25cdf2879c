// src/utils/url.rs

//! URL manipulation utilities.

use url::Url;

use crate::error::Result;

/// Resolve a potentially relative URL against a base URL.
///
/// # Examples
/// ```
/// use harvest::utils::url::resolve;
///
/// assert_eq!(
///     resolve("https://www.saps.gov.za/crimestop/wanted/", "detail.php?bid=1").unwrap(),
///     "https://www.saps.gov.za/crimestop/wanted/detail.php?bid=1"
/// );
/// ```
pub fn resolve(base: &str, href: &str) -> Result<String> {
    let base = Url::parse(base)?;
    Ok(base.join(href.trim())?.to_string())
}

/// Extract the IMDb title id (`tt…`) from a title link.
pub fn imdb_title_id(href: &str) -> Option<&str> {
    let rest = &href[href.find("/title/")? + "/title/".len()..];
    let end = rest.find(|c: char| c == '/' || c == '?').unwrap_or(rest.len());
    let id = &rest[..end];
    let digits = id.strip_prefix("tt")?;
    (!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())).then_some(id)
}

/// Canonical title page for an IMDb id.
pub fn imdb_title_url(id: &str) -> String {
    format!("https://www.imdb.com/title/{id}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_path() {
        assert_eq!(
            resolve("https://example.com/path/", "page.html").unwrap(),
            "https://example.com/path/page.html"
        );
    }

    #[test]
    fn test_resolve_absolute_path() {
        assert_eq!(
            resolve("https://example.com/path/list.php", "/root.html").unwrap(),
            "https://example.com/root.html"
        );
    }

    #[test]
    fn test_resolve_absolute_url() {
        assert_eq!(
            resolve("https://example.com/path/", "https://other.com/page").unwrap(),
            "https://other.com/page"
        );
    }

    #[test]
    fn test_resolve_invalid_base() {
        assert!(resolve("not a url", "page.html").is_err());
    }

    #[test]
    fn test_imdb_title_id() {
        assert_eq!(
            imdb_title_id("/title/tt0111161/?ref_=sr_t_1"),
            Some("tt0111161")
        );
        assert_eq!(
            imdb_title_id("https://www.imdb.com/title/tt0068646/"),
            Some("tt0068646")
        );
        assert_eq!(imdb_title_id("/title/tt/"), None);
        assert_eq!(imdb_title_id("/name/nm0000209/"), None);
    }
}
