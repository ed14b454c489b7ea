use crate::ThemisError;
use std::fmt;

/// Login identifier and secret
///
/// Held only for the duration of a login attempt. `Debug` never prints the
/// secret.
#[derive(Clone)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Rejects blank identifiers and secrets
    pub fn validate(&self) -> Result<(), ThemisError> {
        if self.identifier.trim().is_empty() {
            return Err(ThemisError::Configuration(
                "identifier is missing or empty".to_string(),
            ));
        }

        if self.secret.trim().is_empty() {
            return Err(ThemisError::Configuration(
                "secret is missing or empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}
