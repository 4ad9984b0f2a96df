//! Local file storage for JSA attachments.
//!
//! Files live under `{public_dir}/uploads/jsa` and are referenced by their
//! public path (`/uploads/jsa/<file>`), which is what gets persisted.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Public URL prefix of stored attachments.
pub const PUBLIC_PREFIX: &str = "/uploads/jsa";

/// Attachment store rooted at a public directory.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    dir: PathBuf,
}

impl AttachmentStore {
    pub fn new(public_dir: &Path) -> Self {
        Self {
            dir: public_dir.join("uploads").join("jsa"),
        }
    }

    /// Directory attachments are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write an attachment and return its public reference.
    ///
    /// An empty blob is not stored and yields `None`.
    pub async fn store(&self, bytes: &[u8], original_name: &str) -> AppResult<Option<String>> {
        if bytes.is_empty() {
            return Ok(None);
        }

        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::Storage(format!("Failed to create attachment directory: {}", e))
        })?;

        let filename = unique_filename(original_name);
        tokio::fs::write(self.dir.join(&filename), bytes)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write attachment: {}", e)))?;

        info!("Stored attachment {} ({} bytes)", filename, bytes.len());
        Ok(Some(format!("{}/{}", PUBLIC_PREFIX, filename)))
    }

    /// Remove a stored attachment. A file that is already gone is not an error.
    pub async fn remove(&self, reference: &str) -> AppResult<()> {
        let path = self.resolve(reference)?;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Removed attachment {}", reference);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Attachment {} already missing, nothing to remove", reference);
                Ok(())
            }
            Err(e) => Err(AppError::Storage(format!(
                "Failed to remove attachment {}: {}",
                reference, e
            ))),
        }
    }

    /// Map a public reference to a file inside the attachment directory.
    fn resolve(&self, reference: &str) -> AppResult<PathBuf> {
        let name = reference
            .strip_prefix(PUBLIC_PREFIX)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(reference);

        if name.is_empty()
            || name == "."
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(AppError::InvalidInput(format!(
                "Invalid attachment reference: {}",
                reference
            )));
        }

        Ok(self.dir.join(name))
    }
}

/// `{unix micros}-{8 hex}-{sanitized name}`.
fn unique_filename(original_name: &str) -> String {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros())
        .unwrap_or_default();
    let suffix: [u8; 4] = rand::random();

    format!("{}-{}-{}", micros, hex::encode(suffix), sanitize(original_name))
}

/// Keep ASCII alphanumerics and dots; everything else becomes `_`.
pub fn sanitize(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "attachment".to_string()
    } else {
        cleaned
    }
}
