//! Login handshake with the portal
//!
//! # Components
//!
//! - `Credentials`: the identifier/secret pair supplied by the caller
//! - `AuthState`: states of the login handshake and their legal transitions
//! - `Authenticator`: drives a fresh session through the handshake

mod authenticator;
mod credentials;
mod state;

pub use authenticator::{Authenticator, PASSWORD_FIELD, USER_FIELD};
pub use credentials::Credentials;
pub use state::AuthState;
