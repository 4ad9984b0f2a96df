//! Location and employee reference data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entity::{employee, location};

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateLocationRequest {
    #[validate(custom(function = "crate::validation::validate_name"))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(custom(function = "crate::validation::validate_name"))]
    pub full_name: String,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<location::Model> for LocationResponse {
    fn from(m: location::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: i32,
    pub full_name: String,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<employee::Model> for EmployeeResponse {
    fn from(m: employee::Model) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            job_title: m.job_title,
            department: m.department,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LocationListResponse {
    pub locations: Vec<LocationResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub employees: Vec<EmployeeResponse>,
}
