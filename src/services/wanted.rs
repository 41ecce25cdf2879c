// src/services/wanted.rs

//! Wanted-persons listing and detail-page extraction.

use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{RawRecord, WantedSelectors, WantedSourceConfig, WorkItem};
use crate::normalize::fields::normalize_whitespace;
use crate::normalize::wanted::field;
use crate::pipeline::{Discovered, Extractor, ListingSource};
use crate::services::{element_text, parse_selector};
use crate::utils::http;
use crate::utils::url::resolve;

/// Timestamp format of the `date_scraped` column.
const SCRAPED_AT_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Single-page listing of detail links.
pub struct WantedListing {
    client: Client,
    base_url: String,
    list_url: String,
    link_sel: Selector,
    done: bool,
}

impl WantedListing {
    pub fn new(client: Client, config: &WantedSourceConfig) -> Result<Self> {
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            list_url: resolve(&config.base_url, &config.list_page)?,
            link_sel: parse_selector(&config.selectors.listing_link)?,
            done: false,
        })
    }

    fn parse_page(&self, html: &str) -> Vec<Discovered> {
        let document = Html::parse_document(html);
        document
            .select(&self.link_sel)
            .filter_map(|link| link.value().attr("href"))
            .filter_map(|href| match resolve(&self.base_url, href) {
                Ok(url) => Some(Discovered::new(url.clone(), url)),
                Err(e) => {
                    log::warn!("Skipping listing link '{}': {}", href, e);
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl ListingSource for WantedListing {
    async fn next_page(&mut self) -> Result<Option<Vec<Discovered>>> {
        if self.done {
            return Ok(None);
        }
        let html = http::fetch_text(&self.client, &self.list_url).await?;
        self.done = true;
        Ok(Some(self.parse_page(&html)))
    }
}

struct DetailSelectors {
    name: Selector,
    detail_table: Selector,
    status_blue: Selector,
    status_red: Selector,
    circumstance: Selector,
    row: Selector,
    label: Selector,
    cell: Selector,
    image: Selector,
}

impl DetailSelectors {
    fn compile(s: &WantedSelectors) -> Result<Self> {
        Ok(Self {
            name: parse_selector(&s.name)?,
            detail_table: parse_selector(&s.detail_table)?,
            status_blue: parse_selector(&s.status_blue)?,
            status_red: parse_selector(&s.status_red)?,
            circumstance: parse_selector(&s.circumstance)?,
            row: parse_selector("tr")?,
            label: parse_selector("b")?,
            cell: parse_selector("td")?,
            image: parse_selector("img[src]")?,
        })
    }
}

/// Fetches a detail page and pulls out its raw fields.
pub struct WantedExtractor {
    client: Client,
    base_url: String,
    selectors: DetailSelectors,
}

impl WantedExtractor {
    pub fn new(client: Client, config: &WantedSourceConfig) -> Result<Self> {
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            selectors: DetailSelectors::compile(&config.selectors)?,
        })
    }

    /// Extract fields from a fetched detail page.
    pub fn parse_detail_page(
        &self,
        item: &WorkItem,
        html: &str,
        scraped_at: &str,
    ) -> Result<RawRecord> {
        let document = Html::parse_document(html);
        let sel = &self.selectors;
        let mut raw = RawRecord::new(&item.url).with(field::SCRAPED_AT, scraped_at);

        if let Some(name) = document.select(&sel.name).next() {
            raw.insert(field::FULL_NAME, element_text(&name));
        }

        let status: Vec<String> = document
            .select(&sel.status_blue)
            .chain(document.select(&sel.status_red))
            .map(|badge| normalize_whitespace(&element_text(&badge)))
            .filter(|t| !t.is_empty())
            .collect();
        raw.insert(field::STATUS, status.join(", "));

        let table = document
            .select(&sel.detail_table)
            .next()
            .ok_or_else(|| AppError::schema("detail_table", "detail table not found"))?;

        if let Some(image) = table.select(&sel.image).next() {
            let src = image.value().attr("src").unwrap_or_default();
            raw.insert(field::IMG_URL, resolve(&self.base_url, src)?);

            if let Some(cell) = enclosing_cell(&image) {
                raw.insert(field::MUGSHOT_CELL, cell.inner_html());
            }
        }

        let circumstance: String = table
            .select(&sel.circumstance)
            .flat_map(|p| p.text())
            .collect();
        raw.insert(field::CIRCUMSTANCE, circumstance);

        for row in table.select(&sel.row) {
            let Some(label_elem) = row.select(&sel.label).next() else {
                continue;
            };
            let label = row_label(&label_elem);
            if label.is_empty() || raw.contains(&label) {
                continue;
            }
            if let Some(value) = row_value(&row, &label_elem, &sel.cell) {
                raw.insert(label, value);
            }
        }

        Ok(raw)
    }
}

#[async_trait]
impl Extractor for WantedExtractor {
    async fn extract(&self, item: &WorkItem) -> Result<RawRecord> {
        let html = http::fetch_text(&self.client, &item.url).await?;
        let scraped_at = Local::now().format(SCRAPED_AT_FORMAT).to_string();
        self.parse_detail_page(item, &html, &scraped_at)
    }
}

fn enclosing_cell<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "td")
}

/// Row label without its trailing colon.
fn row_label(label: &ElementRef) -> String {
    element_text(label)
        .trim_matches(|c: char| c == ':' || c.is_whitespace())
        .to_string()
}

/// First non-blank text sitting directly inside the label's cell or a
/// later cell of the same row.
fn row_value(row: &ElementRef, label: &ElementRef, cell: &Selector) -> Option<String> {
    let label_cell = enclosing_cell(label).map(|td| td.id());
    row.select(cell)
        .skip_while(|td| label_cell.is_some_and(|id| td.id() != id))
        .flat_map(|td| td.children().filter_map(|node| node.value().as_text()))
        .map(|text| text.trim())
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{Normalizer, WantedNormalizer};

    const DETAIL_PAGE: &str = r#"
<html><body>
<div class="panel-body">
  <h2>JOHANNES DU PLESSIS</h2>
  <font color="blue">Wanted</font>
  <font color="red">Armed and dangerous</font>
  <table>
    <tr>
      <td><img src="photos/2019_123.jpg" width="150"> 123/2019 <br></td>
      <td><b>Crime:</b> Armed Robbery</td>
    </tr>
    <tr>
      <td><b>Circumstances:</b></td>
      <td><p>The suspect robbed a store,</p><p>fled on foot.</p></td>
    </tr>
    <tr><td><b>Crime Date:</b></td><td>2019-05-04</td></tr>
    <tr><td><b>Gender:</b></td><td>Male</td></tr>
    <tr><td><b>Station:</b></td><td>Hillbrow (Gauteng)</td></tr>
    <tr><td><b>Case Number:</b></td><td>CAS 45/05/2019</td></tr>
    <tr><td><b>Investigating Officer:</b></td><td>Sgt N Dlamini</td></tr>
    <tr><td><b>Aliases:</b></td><td>0</td></tr>
  </table>
</div>
</body></html>
"#;

    fn config() -> WantedSourceConfig {
        WantedSourceConfig {
            base_url: "https://example.com/wanted/".into(),
            ..WantedSourceConfig::default()
        }
    }

    fn item() -> WorkItem {
        WorkItem {
            key: "https://example.com/wanted/detail.php?bid=7".into(),
            url: "https://example.com/wanted/detail.php?bid=7".into(),
            position: 1,
        }
    }

    #[test]
    fn test_parse_detail_page() {
        let extractor = WantedExtractor::new(Client::new(), &config()).unwrap();
        let raw = extractor
            .parse_detail_page(&item(), DETAIL_PAGE, "2026/10/14 09:30")
            .unwrap();

        assert_eq!(raw.get(field::FULL_NAME), Some("JOHANNES DU PLESSIS"));
        assert_eq!(raw.get(field::STATUS), Some("Wanted, Armed and dangerous"));
        assert_eq!(
            raw.get(field::IMG_URL),
            Some("https://example.com/wanted/photos/2019_123.jpg")
        );
        assert_eq!(raw.get(field::CRIME), Some("Armed Robbery"));
        assert_eq!(raw.get(field::STATION), Some("Hillbrow (Gauteng)"));
        assert_eq!(raw.get(field::ALIASES), Some("0"));

        let person = WantedNormalizer::new(&config()).normalize(&raw).unwrap();
        assert_eq!(person.first_name, "Johannes");
        assert_eq!(person.last_name, "Du Plessis");
        assert_eq!(person.npis, "123-2019");
        assert_eq!(person.status, "Wanted, Armed and dangerous");
        assert_eq!(person.crime_circumstance, "The suspect robbed a storefled on foot.");
        assert_eq!(person.case_no, "45/05/2019");
        assert_eq!(person.warrant_no, "");
        assert_eq!(person.alias, "");
        assert_eq!(person.date_scraped, "2026/10/14 09:30");
        assert_eq!(person.url, item().url);
    }

    #[test]
    fn test_wrapped_badge_is_one_status() {
        let extractor = WantedExtractor::new(Client::new(), &config()).unwrap();
        let page = DETAIL_PAGE.replace(
            "<font color=\"red\">Armed and dangerous</font>",
            "<font color=\"red\">Armed and\n      dangerous</font><font color=\"red\">  </font>",
        );
        let raw = extractor
            .parse_detail_page(&item(), &page, "2026/10/14 09:30")
            .unwrap();
        assert_eq!(raw.get(field::STATUS), Some("Wanted, Armed and dangerous"));

        let person = WantedNormalizer::new(&config()).normalize(&raw).unwrap();
        assert_eq!(person.status, "Wanted, Armed and dangerous");
    }

    #[test]
    fn test_missing_table_is_violation() {
        let extractor = WantedExtractor::new(Client::new(), &config()).unwrap();
        let err = extractor
            .parse_detail_page(&item(), "<div class='panel-body'><h2>X</h2></div>", "")
            .unwrap_err();
        assert!(matches!(err, AppError::SchemaViolation { .. }));
    }

    #[test]
    fn test_listing_links_resolve_against_base() {
        let listing = WantedListing::new(Client::new(), &config()).unwrap();
        let page = r#"
            <table><tr><td class="cust-td-border"><a href="detail.php?bid=7">A</a></td>
            <td class="cust-td-border"><a href="detail.php?bid=8">B</a></td></tr></table>
        "#;
        let keys: Vec<_> = listing.parse_page(page).into_iter().map(|d| d.key).collect();
        assert_eq!(
            keys,
            vec![
                "https://example.com/wanted/detail.php?bid=7",
                "https://example.com/wanted/detail.php?bid=8",
            ]
        );
    }
}
