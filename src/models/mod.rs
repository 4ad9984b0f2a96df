//! Domain models and DTOs for the EHS dashboard.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::FieldError;

pub mod jsa;
pub mod reference;

// Re-export commonly used types
pub use jsa::{
    JsaDetailResponse, JsaInput, JsaListItem, JsaListResponse, JsaStatus, JsaStepListResponse,
    JsaStepResponse, NewJsa, NewJsaStep, StepInput, ValidatedJsa,
};
pub use reference::{
    CreateEmployeeRequest, CreateLocationRequest, EmployeeListResponse, EmployeeResponse,
    LocationListResponse, LocationResponse,
};

/// Uniform result of a create/update/delete action.
///
/// Failures never escape as bare errors: they are rendered into this shape
/// with `success: false` and a human-readable `error`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Field-level messages when validation failed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
    /// Non-fatal issues, e.g. an attachment that could not be saved.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ActionResponse {
    pub fn ok(id: Option<i32>, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            id,
            error: None,
            field_errors: Vec::new(),
            warnings,
        }
    }
}
