use crate::extract::ListingPattern;
use crate::tree::FailurePolicy;
use crate::ConfigError;
use serde::Deserialize;
use url::Url;

/// Main configuration structure for Themis-Crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub portal: PortalConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the portal lives and which routes the crawler talks to
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Origin every route and relative link is resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Route of the login form (GET for the token, POST for the credentials)
    #[serde(rename = "login-route", default = "default_login_route")]
    pub login_route: String,

    /// Route of the user profile page
    #[serde(rename = "profile-route", default = "default_profile_route")]
    pub profile_route: String,

    /// Route the assignment crawl starts from
    #[serde(rename = "start-route", default = "default_start_route")]
    pub start_route: String,
}

impl PortalConfig {
    /// Parses the configured base URL
    pub fn base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))
    }

    /// Resolves a route against the base URL
    pub fn route(&self, route: &str) -> Result<Url, ConfigError> {
        self.base()?
            .join(route)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid route '{}': {}", route, e)))
    }

    pub fn login_url(&self) -> Result<Url, ConfigError> {
        self.route(&self.login_route)
    }

    pub fn profile_url(&self) -> Result<Url, ConfigError> {
        self.route(&self.profile_route)
    }

    pub fn start_url(&self) -> Result<Url, ConfigError> {
        self.route(&self.start_route)
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of listing levels to expand below the start page's children
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// What to do when a single page of the crawl fails
    #[serde(rename = "on-error", default)]
    pub on_error: FailurePolicy,

    /// Row layout of the start page
    #[serde(rename = "root-pattern", default)]
    pub root_pattern: ListingPattern,

    /// Run the tooltip date pass over every discovered node
    #[serde(rename = "fetch-dates", default)]
    pub fetch_dates: bool,

    /// Scrape the user profile page after login
    #[serde(rename = "fetch-profile", default = "default_true")]
    pub fetch_profile: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            on_error: FailurePolicy::default(),
            root_pattern: ListingPattern::default(),
            fetch_dates: false,
            fetch_profile: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write the markdown rendering of the tree, if anywhere
    #[serde(rename = "markdown-path")]
    pub markdown_path: Option<String>,
}

fn default_login_route() -> String {
    "/log/in".to_string()
}

fn default_profile_route() -> String {
    "/user".to_string()
}

fn default_start_route() -> String {
    "/course".to_string()
}

fn default_max_depth() -> u32 {
    2
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}
