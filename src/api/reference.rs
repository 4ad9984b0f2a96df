//! Location and employee endpoints backing the JSA form dropdowns.

use actix_web::{HttpResponse, web};
use tracing::info;
use validator::Validate;

use crate::auth::SessionAuth;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateEmployeeRequest, CreateLocationRequest, EmployeeListResponse, EmployeeResponse,
    LocationListResponse, LocationResponse,
};
use crate::validation::flatten_errors;

fn check<T: Validate>(body: &T) -> AppResult<()> {
    body.validate()
        .map_err(|errors| AppError::Validation(flatten_errors(&errors)))
}

#[utoipa::path(
    get,
    path = "/api/v1/locations",
    tag = "Reference Data",
    responses((status = 200, description = "Locations, alphabetical", body = LocationListResponse))
)]
pub async fn list_locations(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let locations = pool.list_locations().await?;
    Ok(HttpResponse::Ok().json(LocationListResponse {
        locations: locations.into_iter().map(LocationResponse::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/locations",
    tag = "Reference Data",
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created", body = LocationResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_location(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateLocationRequest>,
) -> AppResult<HttpResponse> {
    check(&*body)?;
    let body = body.into_inner();
    let location = pool.create_location(&body.name, body.description).await?;
    info!("Created location {} ({})", location.id, location.name);
    Ok(HttpResponse::Created().json(LocationResponse::from(location)))
}

/// Delete a location. JSAs that referenced it lose their location.
#[utoipa::path(
    delete,
    path = "/api/v1/locations/{id}",
    tag = "Reference Data",
    params(("id" = i32, Path, description = "Location id")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 404, description = "Location not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_location(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_location(id).await? {
        return Err(AppError::NotFound(format!("Location {}", id)));
    }
    info!("Deleted location {}", id);
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    tag = "Reference Data",
    responses((status = 200, description = "Employees, alphabetical", body = EmployeeListResponse))
)]
pub async fn list_employees(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let employees = pool.list_employees().await?;
    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        employees: employees.into_iter().map(EmployeeResponse::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/employees",
    tag = "Reference Data",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_employee(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreateEmployeeRequest>,
) -> AppResult<HttpResponse> {
    check(&*body)?;
    let body = body.into_inner();
    let employee = pool
        .create_employee(&body.full_name, body.job_title, body.department)
        .await?;
    info!("Created employee {}", employee.id);
    Ok(HttpResponse::Created().json(EmployeeResponse::from(employee)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    tag = "Reference Data",
    params(("id" = i32, Path, description = "Employee id")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_employee(
    _session: SessionAuth,
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_employee(id).await? {
        return Err(AppError::NotFound(format!("Employee {}", id)));
    }
    info!("Deleted employee {}", id);
    Ok(HttpResponse::NoContent().finish())
}

/// Configure reference data routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/locations")
            .route(web::get().to(list_locations))
            .route(web::post().to(create_location)),
    )
    .service(web::resource("/locations/{id}").route(web::delete().to(delete_location)))
    .service(
        web::resource("/employees")
            .route(web::get().to(list_employees))
            .route(web::post().to(create_employee)),
    )
    .service(web::resource("/employees/{id}").route(web::delete().to(delete_employee)));
}
