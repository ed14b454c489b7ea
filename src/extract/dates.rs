//! Tooltip timestamps on assignment pages
//!
//! The portal renders dates as a short label whose tooltip (`data-title`)
//! holds a JavaScript `Date.toString()` value such as
//! `Sat Nov 18 2023 11:54:03 GMT+0100 (Central European Standard Time)`.

use crate::extract::selector;
use crate::{ExtractError, ExtractResult};
use chrono::{DateTime, FixedOffset};
use scraper::Html;

/// chrono format of the first six tokens of a portal timestamp
pub const PORTAL_TIMESTAMP_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Number of whitespace-separated tokens that make up a timestamp
const TIMESTAMP_TOKENS: usize = 6;

/// Labels of the date lines on an assignment page, in page order
pub const DATE_LABELS: [&str; 3] = ["Start:", "Deadline:", "End:"];

const LINE_SELECTOR: &str = ".cfg-line";
const TOOLTIP_SELECTOR: &str = ".tip[data-title]";

/// Start, deadline and end of an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentDate {
    pub start: DateTime<FixedOffset>,
    pub due: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

/// Keeps the first six whitespace-separated tokens of a timestamp
///
/// Drops the trailing time zone name the browser-style format appends.
pub fn truncate_timestamp(raw: &str) -> ExtractResult<String> {
    let tokens: Vec<&str> = raw.split_whitespace().take(TIMESTAMP_TOKENS).collect();

    if tokens.len() < TIMESTAMP_TOKENS {
        return Err(ExtractError::Parse {
            input: raw.to_string(),
            message: format!(
                "expected at least {} tokens, found {}",
                TIMESTAMP_TOKENS,
                tokens.len()
            ),
        });
    }

    Ok(tokens.join(" "))
}

/// Parses a portal timestamp
///
/// # Example
///
/// ```
/// use themis_crawler::extract::{calendar_date, parse_portal_timestamp};
///
/// let ts = parse_portal_timestamp("Sat Nov 18 2023 11:54:03 GMT+0100 (CET)").unwrap();
/// assert_eq!(calendar_date(&ts), "Sat Nov 18 2023");
/// ```
pub fn parse_portal_timestamp(raw: &str) -> ExtractResult<DateTime<FixedOffset>> {
    let truncated = truncate_timestamp(raw)?;

    DateTime::parse_from_str(&truncated, PORTAL_TIMESTAMP_FORMAT).map_err(|e| {
        ExtractError::Parse {
            input: raw.to_string(),
            message: e.to_string(),
        }
    })
}

/// Renders the calendar part of a timestamp, e.g. `Sat Nov 18 2023`
pub fn calendar_date(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format("%a %b %d %Y").to_string()
}

/// Finds the tooltip timestamp on the `.cfg-line` labeled `label`
///
/// # Returns
///
/// * `Ok(DateTime)` - Parsed tooltip value
/// * `Err(ExtractError::NotFound)` - No labeled line with a tooltip
/// * `Err(ExtractError::Parse)` - Tooltip present but malformed
pub fn extract_tooltip_date(html: &Html, label: &str) -> ExtractResult<DateTime<FixedOffset>> {
    let line_selector = selector(LINE_SELECTOR)?;
    let tooltip_selector = selector(TOOLTIP_SELECTOR)?;

    let raw = html
        .select(&line_selector)
        .filter(|line| line.text().collect::<String>().contains(label))
        .find_map(|line| {
            line.select(&tooltip_selector)
                .next()
                .and_then(|tip| tip.value().attr("data-title"))
        })
        .ok_or_else(|| ExtractError::NotFound(format!("'{}' tooltip date", label)))?;

    parse_portal_timestamp(raw)
}

/// Extracts start, deadline and end dates from an assignment page
///
/// All three lookups run before anything is reported, so a malformed
/// tooltip is never masked by a missing one.
///
/// # Returns
///
/// * `Ok(AssignmentDate)` - All three tooltips present and well-formed
/// * `Err(ExtractError::Parse)` - Any tooltip is malformed
/// * `Err(ExtractError::NotFound)` - The page carries no date tooltips
/// * `Err(ExtractError::Incomplete)` - Some tooltips present, others missing
pub fn extract_assignment_dates(html: &Html) -> ExtractResult<AssignmentDate> {
    let [start, due, end] = DATE_LABELS.map(|label| extract_tooltip_date(html, label));

    let mut missing = Vec::new();
    for (label, result) in DATE_LABELS.iter().zip([&start, &due, &end]) {
        match result {
            Err(ExtractError::NotFound(_)) => missing.push(*label),
            Err(e) => return Err(e.clone()),
            Ok(_) => {}
        }
    }

    match (start, due, end) {
        (Ok(start), Ok(due), Ok(end)) => Ok(AssignmentDate { start, due, end }),
        _ if missing.len() == DATE_LABELS.len() => {
            Err(ExtractError::NotFound("date tooltips".to_string()))
        }
        _ => Err(ExtractError::Incomplete {
            group: "assignment dates".to_string(),
            missing: missing.join(", "),
        }),
    }
}
