//! JSA actions: validate a submission, store its attachment, persist the
//! aggregate and clean up files the database no longer references.

use tracing::{error, info, warn};

use crate::db::DbPool;
use crate::error::{ActionFailure, AppError};
use crate::models::{ActionResponse, JsaInput};
use crate::services::attachments::AttachmentStore;
use crate::validation::validate_submission;

/// A file received with a submission.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// A JSA form as received from the client.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub form: JsaInput,
    pub attachment: Option<UploadedFile>,
    /// Issues found while reading the request, e.g. an oversized file that was skipped.
    pub warnings: Vec<String>,
}

type ActionResult = Result<ActionResponse, ActionFailure>;

/// Orchestrates JSA create, update and delete.
#[derive(Clone)]
pub struct JsaService {
    pool: DbPool,
    attachments: AttachmentStore,
}

impl JsaService {
    pub fn new(pool: DbPool, attachments: AttachmentStore) -> Self {
        Self { pool, attachments }
    }

    /// Store the attachment if there is one. A failed write becomes a warning.
    async fn store_attachment(
        &self,
        attachment: Option<&UploadedFile>,
        warnings: &mut Vec<String>,
    ) -> Option<String> {
        let file = attachment?;
        match self.attachments.store(&file.bytes, &file.original_name).await {
            Ok(reference) => reference,
            Err(e) => {
                warn!("Attachment {} not saved: {}", file.original_name, e);
                warnings.push(format!(
                    "Attachment '{}' could not be saved; the record was kept without it",
                    file.original_name
                ));
                None
            }
        }
    }

    /// Best-effort removal; failures are logged and turned into a warning.
    async fn discard(&self, reference: &str, warnings: &mut Vec<String>) {
        if let Err(e) = self.attachments.remove(reference).await {
            warn!("Failed to remove attachment {}: {}", reference, e);
            warnings.push(format!("Attachment file {} could not be removed", reference));
        }
    }

    /// Validate and insert a new JSA with its steps.
    pub async fn create(&self, submission: Submission) -> ActionResult {
        let Submission {
            form,
            attachment,
            mut warnings,
        } = submission;

        let validated = validate_submission(&form)
            .map_err(|errors| ActionFailure::new(AppError::Validation(errors), warnings.clone()))?;

        let mut record = validated.record;
        record.attachment_path = self
            .store_attachment(attachment.as_ref(), &mut warnings)
            .await;
        let stored = record.attachment_path.clone();
        let step_count = validated.steps.len();

        match self.pool.create_jsa(record, validated.steps).await {
            Ok(id) => {
                info!("Created JSA {} with {} steps", id, step_count);
                Ok(ActionResponse::ok(Some(id), warnings))
            }
            Err(e) => {
                error!("Failed to create JSA: {}", e);
                if let Some(reference) = stored {
                    self.discard(&reference, &mut warnings).await;
                }
                Err(ActionFailure::new(e, warnings))
            }
        }
    }

    /// Validate and rewrite the scalar fields of an existing JSA.
    ///
    /// A new attachment replaces the old one, whose file is then removed.
    /// Steps are never rewritten, so any sent along are ignored unvalidated.
    pub async fn update(&self, id: i32, submission: Submission) -> ActionResult {
        let Submission {
            mut form,
            attachment,
            mut warnings,
        } = submission;

        if !form.steps.is_empty() {
            warn!("Ignoring {} steps sent with update of JSA {}", form.steps.len(), id);
            warnings.push("Steps cannot be changed by an update and were ignored".to_string());
            form.steps.clear();
        }

        let validated = validate_submission(&form)
            .map_err(|errors| ActionFailure::new(AppError::Validation(errors), warnings.clone()))?;

        let mut record = validated.record;
        record.attachment_path = self
            .store_attachment(attachment.as_ref(), &mut warnings)
            .await;
        let stored = record.attachment_path.clone();

        match self.pool.update_jsa(id, record, form.version).await {
            Ok(outcome) => {
                info!("Updated JSA {} to version {}", id, outcome.version);
                if let Some(previous) = outcome.previous_attachment {
                    self.discard(&previous, &mut warnings).await;
                }
                Ok(ActionResponse::ok(Some(id), warnings))
            }
            Err(e) => {
                match &e {
                    AppError::NotFound(_) | AppError::Conflict(_) => {
                        warn!("JSA {} not updated: {}", id, e)
                    }
                    _ => error!("Failed to update JSA {}: {}", id, e),
                }
                if let Some(reference) = stored {
                    self.discard(&reference, &mut warnings).await;
                }
                Err(ActionFailure::new(e, warnings))
            }
        }
    }

    /// Delete a JSA, its steps and its attachment file.
    ///
    /// A missing record is reported as an unsuccessful action, not an error.
    pub async fn delete(&self, id: i32) -> ActionResult {
        let outcome = self.pool.delete_jsa(id).await.map_err(|e| {
            error!("Failed to delete JSA {}: {}", id, e);
            ActionFailure::from(e)
        })?;

        if !outcome.removed {
            warn!("Delete requested for missing JSA {}", id);
            return Err(AppError::NotFound(format!("JSA {}", id)).into());
        }

        let mut warnings = Vec::new();
        if let Some(reference) = outcome.attachment_path {
            self.discard(&reference, &mut warnings).await;
        }

        info!("Deleted JSA {}", id);
        Ok(ActionResponse::ok(Some(id), warnings))
    }
}
