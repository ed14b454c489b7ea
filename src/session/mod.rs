//! HTTP session for talking to the portal
//!
//! This module wraps a cookie-bearing HTTP client:
//! - Building the client with user agent, timeouts and a cookie store
//! - GET requests that turn non-2xx statuses into errors
//! - Form POSTs whose status is left to the caller
//! - Fetched documents that are parsed on demand
//! - Typed fetches of listing, profile and assignment pages

mod client;
mod document;
mod pages;

pub use client::{build_http_client, FormResponse, Session, SessionConfig};
pub use document::Document;
pub use pages::{fetch_assignment_dates, fetch_listing, fetch_profile};
