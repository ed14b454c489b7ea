//! Typed page fetches: fetch through the session, extract from the body

use crate::extract::{
    extract_assignment_dates, extract_listing, extract_profile, AssignmentDate, ListingEntry,
    ListingPattern, UserProfile,
};
use crate::session::Session;
use crate::{ExtractError, ThemisError};
use url::Url;

/// Fetches a listing page and returns its child references
///
/// Links are resolved against the session's base URL.
pub async fn fetch_listing(
    session: &Session,
    url: &Url,
    pattern: ListingPattern,
) -> Result<Vec<ListingEntry>, ThemisError> {
    let document = session.get(url).await?;
    let entries = extract_listing(&document.html(), session.base_url(), pattern);
    tracing::debug!("{} listing entries on {}", entries.len(), url);
    Ok(entries)
}

/// Fetches and extracts the signed-in user's profile
pub async fn fetch_profile(session: &Session, url: &Url) -> Result<UserProfile, ThemisError> {
    let document = session.get(url).await?;
    extract_profile(&document.html()).map_err(|e| e.at(url.as_str()))
}

/// Fetches an assignment page and extracts its start, deadline and end dates
///
/// A page with only some of its date tooltips is logged as a warning and
/// reported as a Protocol error, like a page without any.
pub async fn fetch_assignment_dates(
    session: &Session,
    url: &Url,
) -> Result<AssignmentDate, ThemisError> {
    let document = session.get(url).await?;
    extract_assignment_dates(&document.html()).map_err(|e| {
        if let ExtractError::Incomplete { missing, .. } = &e {
            tracing::warn!("Dates on {} are incomplete, missing {}", url, missing);
        }
        e.at(url.as_str())
    })
}
