//! Job safety analysis models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entity::jsa_step;

/// JSA lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum JsaStatus {
    #[default]
    Draft,
    Active,
    Reviewed,
    Obsolete,
}

impl JsaStatus {
    pub const ALL: [JsaStatus; 4] = [Self::Draft, Self::Active, Self::Reviewed, Self::Obsolete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::Reviewed => "Reviewed",
            Self::Obsolete => "Obsolete",
        }
    }

    /// Parse a status label, ignoring case and surrounding whitespace.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "active" => Some(Self::Active),
            "reviewed" => Some(Self::Reviewed),
            "obsolete" => Some(Self::Obsolete),
            _ => None,
        }
    }
}

impl std::fmt::Display for JsaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw JSA form submission, as sent in the `payload` part of the multipart form.
///
/// Missing fields deserialize to their defaults so that they are reported by
/// validation rather than rejected by the JSON parser.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct JsaInput {
    #[validate(custom(function = "crate::validation::validate_task"))]
    pub task: String,
    #[validate(range(min = 1, message = "Location must be a valid id"))]
    pub location_id: Option<i32>,
    pub department: Option<String>,
    #[validate(range(min = 1, message = "Responsible person must be a valid id"))]
    pub responsible_person_id: Option<i32>,
    pub team_members: Option<String>,
    pub required_ppe: Option<String>,
    /// `Draft`, `Active`, `Reviewed` or `Obsolete`; blank means `Draft`.
    #[validate(custom(function = "crate::validation::validate_status"))]
    pub status: Option<String>,
    /// `YYYY-MM-DD`.
    #[validate(custom(function = "crate::validation::validate_review_date"))]
    pub review_date: Option<String>,
    #[validate(nested)]
    pub steps: Vec<StepInput>,
    /// Version the editor started from. Only read by update; a mismatch is rejected.
    pub version: Option<i32>,
}

/// One step of a JSA form submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StepInput {
    #[validate(custom(function = "crate::validation::validate_step_description"))]
    pub description: String,
    #[validate(custom(function = "crate::validation::validate_step_hazards"))]
    pub hazards: String,
    #[validate(custom(function = "crate::validation::validate_step_controls"))]
    pub controls: String,
    pub risk_level_before: Option<String>,
    pub risk_level_after: Option<String>,
}

/// Normalized JSA fields ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJsa {
    pub task: String,
    pub location_id: Option<i32>,
    pub department: Option<String>,
    pub responsible_person_id: Option<i32>,
    pub team_members: Option<String>,
    pub required_ppe: Option<String>,
    pub status: JsaStatus,
    pub review_date: Option<NaiveDate>,
    pub attachment_path: Option<String>,
}

/// Normalized step fields. Order is positional; `step_order` is assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJsaStep {
    pub description: String,
    pub hazards: String,
    pub controls: String,
    pub risk_level_before: Option<String>,
    pub risk_level_after: Option<String>,
}

/// A validated submission: the parent record plus its ordered steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedJsa {
    pub record: NewJsa,
    pub steps: Vec<NewJsaStep>,
}

/// JSA row enriched with location and responsible person names.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JsaListItem {
    pub id: i32,
    pub task: String,
    pub location_id: Option<i32>,
    pub location_name: Option<String>,
    pub department: Option<String>,
    pub responsible_person_id: Option<i32>,
    pub responsible_person_name: Option<String>,
    pub team_members: Option<String>,
    pub required_ppe: Option<String>,
    pub status: JsaStatus,
    pub review_date: Option<NaiveDate>,
    pub attachment_path: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One step as returned to the client.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JsaStepResponse {
    pub id: i32,
    pub jsa_id: i32,
    pub step_order: i32,
    pub description: String,
    pub hazards: String,
    pub controls: String,
    pub risk_level_before: Option<String>,
    pub risk_level_after: Option<String>,
}

impl From<jsa_step::Model> for JsaStepResponse {
    fn from(m: jsa_step::Model) -> Self {
        Self {
            id: m.id,
            jsa_id: m.jsa_id,
            step_order: m.step_order,
            description: m.description,
            hazards: m.hazards,
            controls: m.controls,
            risk_level_before: m.risk_level_before,
            risk_level_after: m.risk_level_after,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JsaListResponse {
    pub jsas: Vec<JsaListItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct JsaStepListResponse {
    pub steps: Vec<JsaStepResponse>,
}

/// A JSA with its ordered steps.
#[derive(Debug, Serialize, ToSchema)]
pub struct JsaDetailResponse {
    pub jsa: JsaListItem,
    pub steps: Vec<JsaStepResponse>,
}
