//! API endpoint modules.

pub mod auth;
pub mod health;
pub mod jsa;
pub mod openapi;
pub mod reference;

pub use auth::configure_routes as configure_auth_routes;
pub use health::configure_health_routes;
pub use jsa::configure_routes as configure_jsa_routes;
pub use openapi::ApiDoc;
pub use reference::configure_routes as configure_reference_routes;

use actix_web::web;

/// Everything mounted under `/api/v1`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(configure_auth_routes)
        .configure(configure_jsa_routes)
        .configure(configure_reference_routes)
        .service(openapi::openapi_json);
}
