//! Session authentication for the dashboard.

mod extractor;
mod session;

use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::config::SessionSettings;

pub use extractor::{AuthError, SessionAuth};
pub use session::{SESSION_ISSUER, SessionClaims, SessionKeys};

/// The administrator login configured for this instance.
///
/// The password is held in a `SecretString`: `Debug` redacts it and memory is
/// zeroed on drop.
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: SecretString,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    pub fn from_settings(settings: &SessionSettings) -> Self {
        Self::new(
            settings.admin_username.clone(),
            settings.admin_password.clone(),
        )
    }

    /// Compare both fields in constant time.
    ///
    /// Both comparisons always run so a wrong username takes as long as a
    /// wrong password.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self
            .password
            .expose_secret()
            .as_bytes()
            .ct_eq(password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AdminCredentials({}, [REDACTED])", self.username)
    }
}
