//! JSA aggregate persistence: a parent record and its ordered steps,
//! always written and removed together.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set, TransactionTrait,
};

use crate::entity::{employee, jsa, jsa_step, location};
use crate::error::{AppError, AppResult};
use crate::models::{JsaListItem, JsaStatus, NewJsa, NewJsaStep};

use super::DbPool;

/// Result of a successful update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub version: i32,
    /// Attachment that was replaced by the new one, if any.
    pub previous_attachment: Option<String>,
}

/// Result of a delete. A missing record is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub removed: bool,
    pub attachment_path: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct JsaRow {
    id: i32,
    task: String,
    location_id: Option<i32>,
    location_name: Option<String>,
    department: Option<String>,
    responsible_person_id: Option<i32>,
    responsible_person_name: Option<String>,
    team_members: Option<String>,
    required_ppe: Option<String>,
    status: String,
    review_date: Option<NaiveDate>,
    attachment_path: Option<String>,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JsaRow> for JsaListItem {
    type Error = AppError;

    fn try_from(row: JsaRow) -> AppResult<Self> {
        let status = JsaStatus::parse(&row.status).ok_or_else(|| {
            AppError::Database(format!("JSA {} has unknown status '{}'", row.id, row.status))
        })?;

        Ok(Self {
            id: row.id,
            task: row.task,
            location_id: row.location_id,
            location_name: row.location_name,
            department: row.department,
            responsible_person_id: row.responsible_person_id,
            responsible_person_name: row.responsible_person_name,
            team_members: row.team_members,
            required_ppe: row.required_ppe,
            status,
            review_date: row.review_date,
            attachment_path: row.attachment_path,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// JSA columns plus the display names of its location and responsible person.
fn enriched() -> Select<jsa::Entity> {
    jsa::Entity::find()
        .column_as(location::Column::Name, "location_name")
        .column_as(employee::Column::FullName, "responsible_person_name")
        .join(JoinType::LeftJoin, jsa::Relation::Location.def())
        .join(JoinType::LeftJoin, jsa::Relation::ResponsiblePerson.def())
}

fn step_model(jsa_id: i32, position: usize, step: NewJsaStep) -> jsa_step::ActiveModel {
    jsa_step::ActiveModel {
        jsa_id: Set(jsa_id),
        step_order: Set(position as i32 + 1),
        description: Set(step.description),
        hazards: Set(step.hazards),
        controls: Set(step.controls),
        risk_level_before: Set(step.risk_level_before),
        risk_level_after: Set(step.risk_level_after),
        ..Default::default()
    }
}

impl DbPool {
    /// Insert a JSA and its steps in one transaction.
    ///
    /// Steps are numbered 1..N in the order given. If any insert fails the
    /// transaction is dropped uncommitted and nothing is persisted.
    pub async fn create_jsa(&self, record: NewJsa, steps: Vec<NewJsaStep>) -> AppResult<i32> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let now = Utc::now();
        let parent = jsa::ActiveModel {
            task: Set(record.task),
            location_id: Set(record.location_id),
            department: Set(record.department),
            responsible_person_id: Set(record.responsible_person_id),
            team_members: Set(record.team_members),
            required_ppe: Set(record.required_ppe),
            status: Set(record.status.as_str().to_string()),
            review_date: Set(record.review_date),
            attachment_path: Set(record.attachment_path),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert JSA: {}", e)))?;

        for (position, step) in steps.into_iter().enumerate() {
            step_model(parent.id, position, step)
                .insert(&txn)
                .await
                .map_err(|e| {
                    AppError::Database(format!(
                        "Failed to insert step {} of JSA: {}",
                        position + 1,
                        e
                    ))
                })?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit JSA: {}", e)))?;

        Ok(parent.id)
    }

    /// List every JSA, newest first.
    pub async fn list_jsas(&self) -> AppResult<Vec<JsaListItem>> {
        let rows = enriched()
            .order_by_desc(jsa::Column::CreatedAt)
            .order_by_desc(jsa::Column::Id)
            .into_model::<JsaRow>()
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to list JSAs: {}", e)))?;

        rows.into_iter().map(JsaListItem::try_from).collect()
    }

    /// Get one JSA with display names.
    pub async fn get_jsa(&self, id: i32) -> AppResult<Option<JsaListItem>> {
        let row = enriched()
            .filter(jsa::Column::Id.eq(id))
            .into_model::<JsaRow>()
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get JSA: {}", e)))?;

        row.map(JsaListItem::try_from).transpose()
    }

    /// Steps of a JSA in order. Empty when the JSA has none or does not exist.
    pub async fn get_jsa_steps(&self, jsa_id: i32) -> AppResult<Vec<jsa_step::Model>> {
        jsa_step::Entity::find()
            .filter(jsa_step::Column::JsaId.eq(jsa_id))
            .order_by_asc(jsa_step::Column::StepOrder)
            .all(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to get JSA steps: {}", e)))
    }

    /// Rewrite the scalar fields of a JSA. Steps are left as they are.
    ///
    /// `changes.attachment_path` replaces the stored one only when set.
    /// With `expected_version` the write only lands if nobody updated the
    /// record since that version was read.
    pub async fn update_jsa(
        &self,
        id: i32,
        changes: NewJsa,
        expected_version: Option<i32>,
    ) -> AppResult<UpdateOutcome> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let current = jsa::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get JSA: {}", e)))?
            .ok_or_else(|| AppError::NotFound(format!("JSA {}", id)))?;

        if let Some(expected) = expected_version
            && expected != current.version
        {
            return Err(AppError::Conflict(format!(
                "JSA {} was modified by someone else (version {}, expected {})",
                id, current.version, expected
            )));
        }

        let replaces_attachment = changes.attachment_path.is_some();
        let next_version = current.version + 1;

        let mut patch = jsa::ActiveModel {
            task: Set(changes.task),
            location_id: Set(changes.location_id),
            department: Set(changes.department),
            responsible_person_id: Set(changes.responsible_person_id),
            team_members: Set(changes.team_members),
            required_ppe: Set(changes.required_ppe),
            status: Set(changes.status.as_str().to_string()),
            review_date: Set(changes.review_date),
            version: Set(next_version),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if replaces_attachment {
            patch.attachment_path = Set(changes.attachment_path);
        }

        // Guarded on the version we read so a concurrent writer cannot be overwritten.
        let result = jsa::Entity::update_many()
            .set(patch)
            .filter(jsa::Column::Id.eq(id))
            .filter(jsa::Column::Version.eq(current.version))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to update JSA: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(AppError::Conflict(format!(
                "JSA {} was modified concurrently",
                id
            )));
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit JSA update: {}", e)))?;

        Ok(UpdateOutcome {
            version: next_version,
            previous_attachment: if replaces_attachment {
                current.attachment_path
            } else {
                None
            },
        })
    }

    /// Delete a JSA and all of its steps in one transaction.
    ///
    /// Returns the stored attachment reference so the caller can remove the
    /// file after commit.
    pub async fn delete_jsa(&self, id: i32) -> AppResult<DeleteOutcome> {
        let txn = self
            .connection()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

        let Some(existing) = jsa::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to get JSA: {}", e)))?
        else {
            return Ok(DeleteOutcome {
                removed: false,
                attachment_path: None,
            });
        };

        jsa_step::Entity::delete_many()
            .filter(jsa_step::Column::JsaId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete JSA steps: {}", e)))?;

        let result = jsa::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete JSA: {}", e)))?;

        // Someone else removed it first; dropping the txn restores the steps.
        if result.rows_affected == 0 {
            return Ok(DeleteOutcome {
                removed: false,
                attachment_path: None,
            });
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(format!("Failed to commit JSA delete: {}", e)))?;

        Ok(DeleteOutcome {
            removed: true,
            attachment_path: existing.attachment_path,
        })
    }
}
