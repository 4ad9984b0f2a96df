//! JSA endpoints.
//!
//! Create and update take a multipart form: a `payload` part holding the JSON
//! form and an optional `attachment` file part.

use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;
use tracing::warn;

use crate::auth::SessionAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{ActionFailure, AppError, AppResult};
use crate::models::{
    ActionResponse, JsaDetailResponse, JsaInput, JsaListResponse, JsaStepListResponse,
    JsaStepResponse,
};
use crate::services::jsa::{JsaService, Submission, UploadedFile};

/// Form part carrying the JSON submission.
pub const PAYLOAD_PART: &str = "payload";
/// Form part carrying the optional attachment.
pub const ATTACHMENT_PART: &str = "attachment";

// The JSON form itself never needs to be large.
const MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Bytes a whole form may carry, drained parts included.
///
/// An attachment somewhat over its own limit is still read to the end so it
/// can be skipped with a warning; anything past the budget fails the request.
pub fn body_budget(max_upload_size: usize) -> usize {
    MAX_PAYLOAD_BYTES + max_upload_size.saturating_mul(2)
}

/// Remaining byte allowance for one multipart body.
struct BodyBudget {
    remaining: usize,
}

impl BodyBudget {
    fn charge(&mut self, len: usize) -> AppResult<()> {
        self.remaining = self.remaining.checked_sub(len).ok_or_else(|| {
            AppError::InvalidInput("Request body exceeds the upload limit".to_string())
        })?;
        Ok(())
    }
}

/// Drain a multipart field without saving.
async fn drain_field(field: &mut Field, budget: &mut BodyBudget) -> AppResult<()> {
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        budget.charge(chunk.len())?;
    }
    Ok(())
}

/// Read a field into memory, giving up once it grows past `limit`.
///
/// Returns `None` (with the rest of the field drained) when over the limit.
async fn read_field(
    field: &mut Field,
    limit: usize,
    budget: &mut BodyBudget,
) -> AppResult<Option<Vec<u8>>> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
        budget.charge(chunk.len())?;
        if bytes.len() + chunk.len() > limit {
            drain_field(field, budget).await?;
            return Ok(None);
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(Some(bytes))
}

/// Turn the multipart body into a [`Submission`].
///
/// An oversized attachment is skipped with a warning rather than failing the
/// whole form, as long as the body stays within [`body_budget`]. Unknown parts
/// are ignored.
async fn read_submission(payload: &mut Multipart, max_upload_size: usize) -> AppResult<Submission> {
    let mut budget = BodyBudget {
        remaining: body_budget(max_upload_size),
    };
    let mut form: Option<JsaInput> = None;
    let mut attachment = None;
    let mut warnings = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let (name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().unwrap_or_default().to_string(),
                cd.get_filename().map(str::to_string),
            ),
            None => {
                drain_field(&mut field, &mut budget).await?;
                continue;
            }
        };

        match name.as_str() {
            PAYLOAD_PART => {
                let bytes = read_field(&mut field, MAX_PAYLOAD_BYTES, &mut budget)
                    .await?
                    .ok_or_else(|| AppError::InvalidInput("Form payload too large".to_string()))?;
                form = Some(serde_json::from_slice(&bytes)?);
            }
            ATTACHMENT_PART => {
                let original_name = filename.unwrap_or_else(|| "attachment".to_string());
                match read_field(&mut field, max_upload_size, &mut budget).await? {
                    Some(bytes) if !bytes.is_empty() => {
                        attachment = Some(UploadedFile {
                            original_name,
                            bytes,
                        });
                    }
                    Some(_) => {}
                    None => {
                        warn!(
                            "Attachment {} exceeds {} bytes, skipped",
                            original_name, max_upload_size
                        );
                        warnings.push(format!(
                            "Attachment '{}' exceeds the {} byte limit and was not saved",
                            original_name, max_upload_size
                        ));
                    }
                }
            }
            _ => drain_field(&mut field, &mut budget).await?,
        }
    }

    let form = form.ok_or_else(|| {
        AppError::InvalidInput(format!("Missing '{}' form part", PAYLOAD_PART))
    })?;

    Ok(Submission {
        form,
        attachment,
        warnings,
    })
}

/// Create a JSA with its steps.
#[utoipa::path(
    post,
    path = "/api/v1/jsa",
    tag = "JSA",
    request_body(
        content_type = "multipart/form-data",
        description = "`payload`: JSON JsaInput; `attachment`: optional file"
    ),
    responses(
        (status = 201, description = "JSA created", body = ActionResponse),
        (status = 400, description = "Validation failed or body too large", body = ActionResponse),
        (status = 401, description = "Not signed in", body = crate::error::ErrorResponse),
        (status = 500, description = "Persistence failed", body = ActionResponse),
    )
)]
pub async fn create_jsa(
    _session: SessionAuth,
    service: web::Data<JsaService>,
    config: web::Data<Config>,
    mut payload: Multipart,
) -> Result<HttpResponse, ActionFailure> {
    let submission = read_submission(&mut payload, config.storage.max_upload_size).await?;
    let response = service.create(submission).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Update the fields of a JSA. Steps are not changed.
#[utoipa::path(
    put,
    path = "/api/v1/jsa/{id}",
    tag = "JSA",
    params(("id" = i32, Path, description = "JSA id")),
    request_body(
        content_type = "multipart/form-data",
        description = "`payload`: JSON JsaInput with optional `version`; `attachment`: optional file"
    ),
    responses(
        (status = 200, description = "JSA updated", body = ActionResponse),
        (status = 400, description = "Validation failed", body = ActionResponse),
        (status = 404, description = "JSA not found", body = ActionResponse),
        (status = 409, description = "Stale version", body = ActionResponse),
    )
)]
pub async fn update_jsa(
    _session: SessionAuth,
    service: web::Data<JsaService>,
    config: web::Data<Config>,
    path: web::Path<i32>,
    mut payload: Multipart,
) -> Result<HttpResponse, ActionFailure> {
    let id = path.into_inner();
    let submission = read_submission(&mut payload, config.storage.max_upload_size).await?;
    let response = service.update(id, submission).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Delete a JSA, its steps and its attachment.
#[utoipa::path(
    delete,
    path = "/api/v1/jsa/{id}",
    tag = "JSA",
    params(("id" = i32, Path, description = "JSA id")),
    responses(
        (status = 200, description = "JSA deleted", body = ActionResponse),
        (status = 404, description = "JSA not found", body = ActionResponse),
    )
)]
pub async fn delete_jsa(
    _session: SessionAuth,
    service: web::Data<JsaService>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ActionFailure> {
    let response = service.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// List all JSAs, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/jsa",
    tag = "JSA",
    responses(
        (status = 200, description = "All JSAs", body = JsaListResponse),
    )
)]
pub async fn list_jsas(_session: SessionAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let jsas = pool.list_jsas().await?;
    Ok(HttpResponse::Ok().json(JsaListResponse { jsas }))
}

/// Get one JSA with its steps.
#[utoipa::path(
    get,
    path = "/api/v1/jsa/{id}",
    tag = "JSA",
    params(("id" = i32, Path, description = "JSA id")),
    responses(
        (status = 200, description = "JSA with steps", body = JsaDetailResponse),
        (status = 404, description = "JSA not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_jsa(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let jsa = pool
        .get_jsa(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("JSA {}", id)))?;
    let steps = pool.get_jsa_steps(id).await?;

    Ok(HttpResponse::Ok().json(JsaDetailResponse {
        jsa,
        steps: steps.into_iter().map(JsaStepResponse::from).collect(),
    }))
}

/// Steps of a JSA in order. Empty for a JSA without steps or an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/jsa/{id}/steps",
    tag = "JSA",
    params(("id" = i32, Path, description = "JSA id")),
    responses(
        (status = 200, description = "Ordered steps", body = JsaStepListResponse),
    )
)]
pub async fn get_jsa_steps(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let steps = pool.get_jsa_steps(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(JsaStepListResponse {
        steps: steps.into_iter().map(JsaStepResponse::from).collect(),
    }))
}

/// Configure JSA routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/jsa")
            .route(web::get().to(list_jsas))
            .route(web::post().to(create_jsa)),
    )
    .service(
        web::resource("/jsa/{id}")
            .route(web::get().to(get_jsa))
            .route(web::put().to(update_jsa))
            .route(web::delete().to(delete_jsa)),
    )
    .service(web::resource("/jsa/{id}/steps").route(web::get().to(get_jsa_steps)));
}
