//! Cookie-bearing HTTP client
//!
//! Every request of a crawl goes through one [`Session`] so cookies set by
//! the login handshake are replayed on all later page fetches.

use crate::config::Config;
use crate::session::Document;
use crate::{ConfigError, ThemisError};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Settings needed to build a [`Session`]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Origin relative links and routes are resolved against
    pub base_url: Url,

    /// Full User-Agent header value
    pub user_agent: String,

    /// Whole-request timeout
    pub request_timeout: Duration,

    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl SessionConfig {
    /// Creates session settings with default timeouts
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Derives session settings from the crawler configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config.portal.base()?,
            user_agent: format!(
                "{}/{}",
                config.user_agent.crawler_name, config.user_agent.crawler_version
            ),
            request_timeout: Duration::from_secs(config.crawler.request_timeout_secs),
            connect_timeout: Duration::from_secs(config.crawler.connect_timeout_secs),
        })
    }
}

/// Response to a form submission
///
/// The status is not judged here: the login handshake decides what counts
/// as success.
#[derive(Debug, Clone)]
pub struct FormResponse {
    /// URL the form was posted to
    pub url: Url,

    /// HTTP status code
    pub status: u16,

    /// Response body, fully read
    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are not followed: the portal answers a failed login with a
/// redirect, and the caller has to see that status.
pub fn build_http_client(config: &SessionConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .cookie_store(true)
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// An HTTP session bound to one portal
///
/// The cookie store lives inside the client. Once the login handshake has
/// run, the session is only ever used through shared references.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    base_url: Url,
}

impl Session {
    /// Creates a fresh, unauthenticated session
    pub fn new(config: &SessionConfig) -> Result<Self, ThemisError> {
        let client = build_http_client(config).map_err(|source| ThemisError::Transport {
            url: config.base_url.to_string(),
            source,
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// The origin this session talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a route or absolute URL against the base URL
    pub fn resolve(&self, target: &str) -> Result<Url, ThemisError> {
        Ok(self.base_url.join(target)?)
    }

    /// Fetches a page
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` - 2xx response with its body fully read
    /// * `Err(ThemisError::Status)` - Any other status
    /// * `Err(ThemisError::Transport)` - Network failure or unreadable body
    pub async fn get(&self, url: &Url) -> Result<Document, ThemisError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| transport(url, source))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ThemisError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|source| transport(url, source))?;

        Ok(Document::new(url.clone(), body))
    }

    /// Submits a URL-encoded form
    ///
    /// Cookies set by earlier responses are sent along, and cookies set by
    /// this response are stored for later requests.
    pub async fn post_form(
        &self,
        url: &Url,
        fields: &[(&str, &str)],
    ) -> Result<FormResponse, ThemisError> {
        tracing::debug!("POST {} ({} fields)", url, fields.len());

        let response = self
            .client
            .post(url.clone())
            .form(fields)
            .send()
            .await
            .map_err(|source| transport(url, source))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|source| transport(url, source))?;

        Ok(FormResponse {
            url: url.clone(),
            status,
            body,
        })
    }
}

fn transport(url: &Url, source: reqwest::Error) -> ThemisError {
    ThemisError::Transport {
        url: url.to_string(),
        source,
    }
}
