//! The login handshake
//!
//! # Protocol
//!
//! 1. Validate the caller's credentials (no request is made if they are blank)
//! 2. GET the login route through the session
//! 3. Read the `_csrf` token from the login form
//! 4. POST `user`, `password` and `_csrf` to the login route through the
//!    same session, so the token and the cookie it is bound to travel together
//! 5. Accept only a 200 answer; the portal answers failed logins with a redirect
//!
//! Nothing is retried. A failed handshake leaves the session unusable; start
//! over with a fresh `Session`.

use crate::auth::{AuthState, Credentials};
use crate::extract::{extract_csrf_token, CSRF_FIELD};
use crate::session::Session;
use crate::ThemisError;
use reqwest::StatusCode;
use url::Url;

/// Form field carrying the identifier
pub const USER_FIELD: &str = "user";

/// Form field carrying the secret
pub const PASSWORD_FIELD: &str = "password";

/// Drives one session through the login handshake
#[derive(Debug)]
pub struct Authenticator {
    session: Session,
    login_url: Url,
    state: AuthState,
}

impl Authenticator {
    /// Wraps a fresh session
    ///
    /// # Arguments
    ///
    /// * `session` - A session that has not logged in yet
    /// * `login_url` - Absolute URL of the login route
    pub fn new(session: Session, login_url: Url) -> Self {
        Self {
            session,
            login_url,
            state: AuthState::Unauthenticated,
        }
    }

    /// Current handshake state
    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Runs the whole handshake
    ///
    /// On error the state ends in `Failed`. Running a second time on the
    /// same authenticator is an `InvalidTransition`.
    pub async fn run(&mut self, credentials: &Credentials) -> Result<(), ThemisError> {
        if self.state != AuthState::Unauthenticated {
            return Err(ThemisError::InvalidTransition {
                from: self.state,
                to: AuthState::LoginPageFetched,
            });
        }

        match self.handshake(credentials).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::warn!("Login failed in state {}: {}", self.state, e);
                self.state = AuthState::Failed;
                Err(e)
            }
        }
    }

    /// Releases the session once authenticated
    pub fn into_session(self) -> Result<Session, ThemisError> {
        if self.state.is_success() {
            Ok(self.session)
        } else {
            Err(ThemisError::InvalidTransition {
                from: self.state,
                to: AuthState::Authenticated,
            })
        }
    }

    /// Runs the handshake and returns the authenticated session
    pub async fn authenticate(mut self, credentials: &Credentials) -> Result<Session, ThemisError> {
        self.run(credentials).await?;
        self.into_session()
    }

    async fn handshake(&mut self, credentials: &Credentials) -> Result<(), ThemisError> {
        credentials.validate()?;

        let login_page = self.session.get(&self.login_url).await?;
        self.advance(AuthState::LoginPageFetched)?;

        let token = extract_csrf_token(&login_page.html())
            .map_err(|e| e.at(login_page.url.as_str()))?;
        self.advance(AuthState::TokenExtracted)?;

        let response = self
            .session
            .post_form(
                &self.login_url,
                &[
                    (USER_FIELD, credentials.identifier.as_str()),
                    (PASSWORD_FIELD, credentials.secret.as_str()),
                    (CSRF_FIELD, token.as_str()),
                ],
            )
            .await?;
        self.advance(AuthState::CredentialsSubmitted)?;

        if response.status != StatusCode::OK.as_u16() {
            return Err(ThemisError::Authentication {
                url: response.url.to_string(),
                status: response.status,
            });
        }

        self.advance(AuthState::Authenticated)?;
        tracing::info!("Login successful as {}", credentials.identifier);
        Ok(())
    }

    fn advance(&mut self, to: AuthState) -> Result<(), ThemisError> {
        if !self.state.can_transition_to(to) {
            return Err(ThemisError::InvalidTransition {
                from: self.state,
                to,
            });
        }

        tracing::debug!("Login state {} -> {}", self.state, to);
        self.state = to;
        Ok(())
    }
}
