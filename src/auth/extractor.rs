//! Actix-web extractor requiring a valid session.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use std::future::{Ready, ready};

use super::{SessionClaims, SessionKeys};
use crate::config::SESSION_COOKIE;
use crate::error::ErrorResponse;

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires a signed, unexpired session token, taken from the
/// `ehs_session` cookie or an `Authorization: Bearer` header.
///
/// ```ignore
/// async fn protected_handler(session: SessionAuth) -> impl Responder {
///     // session.claims.sub is the logged-in user
/// }
/// ```
#[derive(Debug)]
pub struct SessionAuth {
    pub claims: SessionClaims,
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
}

impl FromRequest for SessionAuth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(keys) = req.app_data::<web::Data<SessionKeys>>() else {
            return ready(Err(AuthError {
                message: "Internal configuration error".to_string(),
            }));
        };

        let token = req
            .cookie(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
            .or_else(|| bearer_token(req));

        let Some(token) = token else {
            return ready(Err(AuthError {
                message: "Not signed in".to_string(),
            }));
        };

        match keys.verify(&token) {
            Ok(claims) => ready(Ok(SessionAuth { claims })),
            Err(_) => ready(Err(AuthError {
                message: "Session is invalid or expired".to_string(),
            })),
        }
    }
}
