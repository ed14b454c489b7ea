//! Extraction of portal values from parsed HTML documents
//!
//! Everything in here is a pure function of a parsed document:
//! - `listing`: child (name, URL) references of a listing page
//! - `fields`: CSRF token, labeled key/value rows and the user profile
//! - `dates`: tooltip-embedded timestamps of an assignment page
//!
//! Nothing here performs I/O; the session and tree modules feed documents in.

mod dates;
mod fields;
mod listing;

pub use dates::{
    calendar_date, extract_assignment_dates, extract_tooltip_date, parse_portal_timestamp,
    truncate_timestamp, AssignmentDate, DATE_LABELS, PORTAL_TIMESTAMP_FORMAT,
};
pub use fields::{
    extract_csrf_token, extract_field, extract_fields, extract_profile, UserProfile, CSRF_FIELD,
};
pub use listing::{extract_listing, has_listing_entries, ListingEntry, ListingPattern};

use crate::{ExtractError, ExtractResult};
use scraper::Selector;

/// Compiles a fixed CSS selector
fn selector(css: &str) -> ExtractResult<Selector> {
    Selector::parse(css).map_err(|e| ExtractError::Parse {
        input: css.to_string(),
        message: format!("{:?}", e),
    })
}
