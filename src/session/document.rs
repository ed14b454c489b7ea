//! A fetched page, kept as text until someone needs the DOM

use scraper::Html;
use url::Url;

/// A fully read HTML response body
///
/// The body is stored as text and parsed on demand: `scraper::Html` is not
/// `Send`, so it must never be held across an `.await`.
#[derive(Debug, Clone)]
pub struct Document {
    /// URL the document was fetched from
    pub url: Url,

    /// Raw response body
    pub body: String,
}

impl Document {
    pub fn new(url: Url, body: String) -> Self {
        Self { url, body }
    }

    /// Parses the body into a DOM
    pub fn html(&self) -> Html {
        Html::parse_document(&self.body)
    }
}
