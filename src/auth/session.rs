//! Signed session tokens carried in the `ehs_session` cookie.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::{SESSION_COOKIE, SessionSettings};
use crate::error::{AppError, AppResult};

/// JWT issuer for session tokens.
pub const SESSION_ISSUER: &str = "ehs";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
}

impl SessionClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp as i64, 0)
    }
}

/// HS256 signing material plus cookie policy.
#[derive(Clone)]
pub struct SessionKeys {
    secret: SecretString,
    ttl_secs: u64,
    secure_cookie: bool,
}

impl SessionKeys {
    pub fn new(secret: SecretString, ttl_secs: u64, secure_cookie: bool) -> Self {
        Self {
            secret,
            ttl_secs,
            secure_cookie,
        }
    }

    pub fn from_settings(settings: &SessionSettings, secure_cookie: bool) -> Self {
        Self::new(settings.secret.clone(), settings.ttl_secs, secure_cookie)
    }

    /// Issue a token for `subject` that expires after the configured TTL.
    pub fn issue(&self, subject: &str) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + chrono::Duration::seconds(self.ttl_secs as i64);

        let claims = SessionClaims {
            sub: subject.to_string(),
            iss: SESSION_ISSUER.to_string(),
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let key = EncodingKey::from_secret(self.secret.expose_secret().as_bytes());
        encode(&Header::default(), &claims, &key)
            .map_err(|e| AppError::Unauthorized(format!("Failed to create session token: {}", e)))
    }

    /// Verify signature, issuer and expiry.
    pub fn verify(&self, token: &str) -> AppResult<SessionClaims> {
        let key = DecodingKey::from_secret(self.secret.expose_secret().as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);
        validation.validate_aud = false;
        validation.leeway = 0;

        decode::<SessionClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Unauthorized(format!("Invalid session token: {}", e)))
    }

    /// Cookie carrying a freshly issued token.
    pub fn cookie(&self, token: String) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, token);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_secure(self.secure_cookie);
        cookie.set_max_age(CookieDuration::seconds(self.ttl_secs as i64));
        cookie
    }

    /// Cookie that makes the browser drop the session.
    pub fn clear_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::new(SESSION_COOKIE, "");
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_secure(self.secure_cookie);
        cookie.set_max_age(CookieDuration::ZERO);
        cookie
    }
}
