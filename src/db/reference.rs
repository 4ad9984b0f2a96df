//! Locations and employees referenced by JSAs.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};

use crate::entity::{employee, location};
use crate::error::{AppError, AppResult};

use super::DbPool;

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl DbPool {
    pub async fn create_location(
        &self,
        name: &str,
        description: Option<String>,
    ) -> AppResult<location::Model> {
        location::ActiveModel {
            name: Set(name.trim().to_string()),
            description: Set(trimmed(description)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert location: {}", e)))
    }

    /// All locations, alphabetical.
    pub async fn list_locations(&self) -> AppResult<Vec<location::Model>> {
        location::Entity::find()
            .order_by_asc(location::Column::Name)
            .order_by_asc(location::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list locations: {}", e)))
    }

    /// Delete a location. JSAs pointing at it keep existing with no location.
    ///
    /// Returns false when no such location exists.
    pub async fn delete_location(&self, id: i32) -> AppResult<bool> {
        let result = location::Entity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete location: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn create_employee(
        &self,
        full_name: &str,
        job_title: Option<String>,
        department: Option<String>,
    ) -> AppResult<employee::Model> {
        employee::ActiveModel {
            full_name: Set(full_name.trim().to_string()),
            job_title: Set(trimmed(job_title)),
            department: Set(trimmed(department)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.connection())
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert employee: {}", e)))
    }

    /// All employees, alphabetical by name.
    pub async fn list_employees(&self) -> AppResult<Vec<employee::Model>> {
        employee::Entity::find()
            .order_by_asc(employee::Column::FullName)
            .order_by_asc(employee::Column::Id)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list employees: {}", e)))
    }

    /// Delete an employee. JSAs naming them as responsible person keep existing.
    pub async fn delete_employee(&self, id: i32) -> AppResult<bool> {
        let result = employee::Entity::delete_by_id(id)
            .exec(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete employee: {}", e)))?;

        Ok(result.rows_affected > 0)
    }
}
