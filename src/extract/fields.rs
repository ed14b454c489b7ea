//! Single-value extraction: CSRF token, labeled rows, user profile

use crate::extract::dates::parse_portal_timestamp;
use crate::extract::selector;
use crate::{ExtractError, ExtractResult};
use chrono::{DateTime, FixedOffset};
use scraper::{ElementRef, Html};

/// Name of the hidden login-form input holding the CSRF token
pub const CSRF_FIELD: &str = "_csrf";

const CSRF_SELECTOR: &str = "input[name='_csrf']";
const ROW_SELECTOR: &str = "section.border.accent div.cfg-container div.cfg-line";
const KEY_SELECTOR: &str = "span.cfg-key";
const VALUE_SELECTOR: &str = "span.cfg-val";

/// Reads the CSRF token from a login page
///
/// # Returns
///
/// * `Ok(String)` - The `value` attribute of the `_csrf` input
/// * `Err(ExtractError::NotFound)` - No such input, or it has no value
pub fn extract_csrf_token(html: &Html) -> ExtractResult<String> {
    let input_selector = selector(CSRF_SELECTOR)?;

    html.select(&input_selector)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(str::to_string)
        .ok_or_else(|| ExtractError::NotFound("CSRF token".to_string()))
}

/// Collects every labeled key/value row in document order
///
/// Keys and values are trimmed. Rows missing either span contribute an
/// empty string for it.
pub fn extract_fields(html: &Html) -> ExtractResult<Vec<(String, String)>> {
    let row_selector = selector(ROW_SELECTOR)?;
    let key_selector = selector(KEY_SELECTOR)?;
    let value_selector = selector(VALUE_SELECTOR)?;

    Ok(html
        .select(&row_selector)
        .map(|row| {
            (
                span_text(row, &key_selector),
                span_text(row, &value_selector),
            )
        })
        .collect())
}

/// Returns the value of the first row whose key matches `label`
///
/// Labels compare after trimming whitespace and a trailing colon, so
/// `"Email"` and `"Email:"` both match a `Email:` key.
pub fn extract_field(html: &Html, label: &str) -> ExtractResult<String> {
    extract_fields(html)?
        .into_iter()
        .find(|(key, _)| labels_match(key, label))
        .map(|(_, value)| value)
        .ok_or_else(|| ExtractError::NotFound(format!("field '{}'", label)))
}

/// The signed-in user's profile page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub full_name: String,
    pub last_name: String,
    pub initials: String,
    pub email: String,
    pub first_login_at: DateTime<FixedOffset>,
    pub last_login_at: DateTime<FixedOffset>,
}

/// Extracts the user profile from the profile page
///
/// All six fields are required; login timestamps use the portal timestamp
/// format (see [`parse_portal_timestamp`]).
pub fn extract_profile(html: &Html) -> ExtractResult<UserProfile> {
    let fields = extract_fields(html)?;
    let lookup = |label: &str| -> ExtractResult<String> {
        fields
            .iter()
            .find(|(key, _)| labels_match(key, label))
            .map(|(_, value)| value.clone())
            .ok_or_else(|| ExtractError::NotFound(format!("field '{}'", label)))
    };

    Ok(UserProfile {
        full_name: lookup("Full name:")?,
        last_name: lookup("Last name:")?,
        initials: lookup("Initials:")?,
        email: lookup("Email:")?,
        first_login_at: parse_portal_timestamp(&lookup("First login:")?)?,
        last_login_at: parse_portal_timestamp(&lookup("Last login:")?)?,
    })
}

fn span_text(row: ElementRef<'_>, span_selector: &scraper::Selector) -> String {
    row.select(span_selector)
        .next()
        .map(|span| span.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn labels_match(key: &str, label: &str) -> bool {
    normalize_label(key) == normalize_label(label)
}

fn normalize_label(label: &str) -> &str {
    label.trim().trim_end_matches(':').trim_end()
}
