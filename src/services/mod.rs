//! Business logic services.

pub mod attachments;
pub mod jsa;

pub use attachments::AttachmentStore;
pub use jsa::{JsaService, Submission, UploadedFile};
