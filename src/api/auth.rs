//! Login, logout and session introspection.

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::auth::{AdminCredentials, SessionAuth, SessionKeys};
use crate::error::{AppError, AppResult};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub username: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Exchange the admin credentials for a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in; session cookie set", body = SessionResponse),
        (status = 401, description = "Wrong username or password", body = crate::error::ErrorResponse),
    )
)]
#[post("/auth/login")]
pub async fn login(
    credentials: web::Data<AdminCredentials>,
    keys: web::Data<SessionKeys>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    if !credentials.verify(&body.username, &body.password) {
        warn!("Failed login attempt for user '{}'", body.username);
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let token = keys.issue(&body.username)?;
    let claims = keys.verify(&token)?;
    info!("User '{}' signed in", body.username);

    Ok(HttpResponse::Ok()
        .cookie(keys.cookie(token))
        .json(SessionResponse {
            username: claims.sub.clone(),
            expires_at: claims.expires_at(),
        }))
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Signed out"))
)]
#[post("/auth/logout")]
pub async fn logout(keys: web::Data<SessionKeys>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(keys.clear_cookie())
        .json(serde_json::json!({ "message": "Logged out" }))
}

/// Who is signed in and until when.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Not signed in", body = crate::error::ErrorResponse),
    )
)]
#[get("/auth/me")]
pub async fn me(session: SessionAuth) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse {
        expires_at: session.claims.expires_at(),
        username: session.claims.sub,
    })
}

/// Configure auth routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login).service(logout).service(me);
}
