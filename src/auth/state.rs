/// Login handshake states
///
/// This module defines every state a session passes through while logging in.
use std::fmt;

/// Represents the progress of the login handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthState {
    // ===== Active States =====
    /// Fresh session, nothing sent yet
    Unauthenticated,

    /// Login page fetched, token not read yet
    LoginPageFetched,

    /// CSRF token read from the login page
    TokenExtracted,

    /// Credentials and token posted, response not judged yet
    CredentialsSubmitted,

    // ===== Terminal States =====
    /// Login answered with 200; the session carries the login cookies
    Authenticated,

    /// The handshake stopped; the session must be discarded
    Failed,
}

impl AuthState {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Authenticated | Self::Failed)
    }

    /// Returns true if this represents a successful login
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// The single forward step out of this state, if any
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Unauthenticated => Some(Self::LoginPageFetched),
            Self::LoginPageFetched => Some(Self::TokenExtracted),
            Self::TokenExtracted => Some(Self::CredentialsSubmitted),
            Self::CredentialsSubmitted => Some(Self::Authenticated),
            Self::Authenticated | Self::Failed => None,
        }
    }

    /// Checks whether moving to `to` is legal
    ///
    /// Every non-terminal state may move one step forward or to `Failed`.
    /// Terminal states never move.
    pub fn can_transition_to(&self, to: AuthState) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Failed || self.next() == Some(to)
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::LoginPageFetched => "login_page_fetched",
            Self::TokenExtracted => "token_extracted",
            Self::CredentialsSubmitted => "credentials_submitted",
            Self::Authenticated => "authenticated",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}
