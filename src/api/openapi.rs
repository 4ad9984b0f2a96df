//! OpenAPI documentation configuration.

use actix_web::{HttpResponse, get};
use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "EHS Dashboard Server",
        version = "0.3.0",
        description = "Environment/Health/Safety records: job safety analyses with ordered steps and attachments"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Auth endpoints
        api::auth::login,
        api::auth::logout,
        api::auth::me,
        // JSA endpoints
        api::jsa::create_jsa,
        api::jsa::list_jsas,
        api::jsa::get_jsa,
        api::jsa::get_jsa_steps,
        api::jsa::update_jsa,
        api::jsa::delete_jsa,
        // Reference data endpoints
        api::reference::list_locations,
        api::reference::create_location,
        api::reference::delete_location,
        api::reference::list_employees,
        api::reference::create_employee,
        api::reference::delete_employee,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            error::FieldError,
            models::ActionResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Auth
            api::auth::LoginRequest,
            api::auth::SessionResponse,
            // JSA
            models::JsaStatus,
            models::JsaInput,
            models::StepInput,
            models::JsaListItem,
            models::JsaStepResponse,
            models::JsaListResponse,
            models::JsaStepListResponse,
            models::JsaDetailResponse,
            // Reference data
            models::CreateLocationRequest,
            models::CreateEmployeeRequest,
            models::LocationResponse,
            models::EmployeeResponse,
            models::LocationListResponse,
            models::EmployeeListResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Session login and logout"),
        (name = "JSA", description = "Job safety analyses and their steps"),
        (name = "Reference Data", description = "Locations and employees")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add session cookie security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Cookie(
                        utoipa::openapi::security::ApiKeyValue::new(
                            crate::config::SESSION_COOKIE,
                        ),
                    ),
                ),
            );
        }
    }
}

/// Serve the OpenAPI document.
#[get("/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
