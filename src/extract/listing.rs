//! Listing extraction for assignment and course overview pages
//!
//! A listing page enumerates its children as rows, each row holding at most
//! one link. A row without a link is an activity with nothing below it.

use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use url::Url;

/// Anchor carrying the child's label and link inside a listing row
const ANCHOR_SELECTOR: &str = "span.ass-link a";

/// One child reference found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Visible label, trimmed
    pub name: String,

    /// Absolute URL of the child page
    pub url: Url,
}

/// Row layouts the portal uses for listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListingPattern {
    /// Children block of a course or assignment page
    #[default]
    Children,

    /// Side navigation of the course overview
    Navigation,
}

impl ListingPattern {
    /// CSS selector matching one row of this layout
    pub fn row_selector(&self) -> &'static str {
        match self {
            Self::Children => "div.subsec.round.shade.ass-children ul.round li",
            Self::Navigation => "ul.nav-list li",
        }
    }
}

/// Extracts the child references of a listing page in document order
///
/// # Extraction Rules
///
/// - Each row contributes its first `span.ass-link a` anchor
/// - Rows whose anchor is missing or has no href are skipped
/// - Anchors with an empty label are skipped
/// - Hrefs are resolved against `base_url`; only http(s) results are kept
///
/// An empty result is not an error: it marks a leaf.
///
/// # Example
///
/// ```
/// use themis_crawler::extract::{extract_listing, ListingPattern};
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(r#"
///     <div class="subsec round shade ass-children"><ul class="round">
///         <li><span class="ass-link"><a href="/course/2023-24/os">  OS </a></span></li>
///     </ul></div>"#);
/// let base = Url::parse("https://themis.housing.rug.nl").unwrap();
/// let entries = extract_listing(&html, &base, ListingPattern::Children);
/// assert_eq!(entries[0].name, "OS");
/// assert_eq!(entries[0].url.as_str(), "https://themis.housing.rug.nl/course/2023-24/os");
/// ```
pub fn extract_listing(html: &Html, base_url: &Url, pattern: ListingPattern) -> Vec<ListingEntry> {
    let mut entries = Vec::new();

    let (Ok(row_selector), Ok(anchor_selector)) = (
        Selector::parse(pattern.row_selector()),
        Selector::parse(ANCHOR_SELECTOR),
    ) else {
        return entries;
    };

    for row in html.select(&row_selector) {
        let Some(anchor) = row.select(&anchor_selector).next() else {
            continue;
        };

        if let Some(entry) = entry_from_anchor(anchor, base_url) {
            entries.push(entry);
        }
    }

    entries
}

/// Returns true if any row of the listing yields a child reference
///
/// A page is a leaf only when none of its rows carries a usable link. This
/// applies the same rules as [`extract_listing`], so both always agree.
pub fn has_listing_entries(html: &Html, base_url: &Url, pattern: ListingPattern) -> bool {
    !extract_listing(html, base_url, pattern).is_empty()
}

fn entry_from_anchor(anchor: ElementRef<'_>, base_url: &Url) -> Option<ListingEntry> {
    let href = anchor.value().attr("href")?;

    let name = anchor.text().collect::<String>().trim().to_string();
    if name.is_empty() {
        return None;
    }

    let url = resolve_link(href, base_url)?;
    Some(ListingEntry { name, url })
}

/// Resolves a link href to an absolute URL
///
/// Returns None for empty hrefs, fragment-only links, `javascript:` links
/// and anything that does not resolve to http or https.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
