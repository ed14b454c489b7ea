//! Themis-Crawler: an authenticated assignment-tree crawler
//!
//! This crate logs into the Themis course-management portal and maps the
//! hierarchy of courses, assignments, sub-assignments and activities by
//! walking its HTML listing pages.

pub mod auth;
pub mod config;
pub mod extract;
pub mod output;
pub mod session;
pub mod tree;

use thiserror::Error;

/// Main error type for Themis-Crawler operations
#[derive(Debug, Error)]
pub enum ThemisError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid credentials: {0}")]
    Configuration(String),

    #[error("HTTP error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Unexpected page structure at {url}: {message}")]
    Protocol { url: String, message: String },

    #[error("Login failed at {url}, status code = {status}")]
    Authentication { url: String, status: u16 },

    #[error("Failed to parse value from {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: auth::AuthState,
        to: auth::AuthState,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error classification used for reporting
///
/// Lets an operator tell "the portal changed its markup" apart from
/// "network or credentials problem" without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network or HTTP-layer failure, including non-2xx data fetches
    Transport,
    /// An expected markup element (token, label, tooltip) was missing
    Protocol,
    /// The login POST did not answer with 200
    Authentication,
    /// Invalid caller-supplied credentials or configuration
    Configuration,
    /// A scraped value did not match its expected format
    Parse,
}

impl ThemisError {
    /// Returns the classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } | Self::Status { .. } | Self::Io(_) => ErrorKind::Transport,
            Self::Protocol { .. } | Self::InvalidTransition { .. } => ErrorKind::Protocol,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Config(_) | Self::Configuration(_) | Self::UrlParse(_) => {
                ErrorKind::Configuration
            }
            Self::Parse { .. } => ErrorKind::Parse,
        }
    }

    /// Returns the URL the error is attached to, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Protocol { url, .. }
            | Self::Authentication { url, .. }
            | Self::Parse { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Returns the HTTP status code carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::Authentication { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while extracting values from a single parsed document
///
/// These carry no URL; callers attach one with [`ExtractError::at`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("cannot parse '{input}': {message}")]
    Parse { input: String, message: String },

    /// Some, but not all, of a group of related values were present
    #[error("incomplete {group}: missing {missing}")]
    Incomplete { group: String, missing: String },
}

impl ExtractError {
    /// Attaches the URL of the document the extraction ran on
    pub fn at(self, url: impl Into<String>) -> ThemisError {
        let url = url.into();
        match self {
            Self::NotFound(what) => ThemisError::Protocol {
                url,
                message: format!("{} not found", what),
            },
            Self::Parse { input, message } => ThemisError::Parse {
                url,
                message: format!("'{}': {}", input, message),
            },
            Self::Incomplete { group, missing } => ThemisError::Protocol {
                url,
                message: format!("incomplete {}: missing {}", group, missing),
            },
        }
    }
}

/// Result type alias for Themis-Crawler operations
pub type Result<T> = std::result::Result<T, ThemisError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for document extraction
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

// Re-export commonly used types
pub use auth::{AuthState, Authenticator, Credentials};
pub use config::Config;
pub use extract::{ListingEntry, ListingPattern, UserProfile};
pub use session::{Document, Session};
pub use tree::{AssignmentNode, AssignmentTree, DiscoveryEvent, FailurePolicy, NodeId, TreeBuilder};
