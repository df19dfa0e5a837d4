use crate::error::ChatError;
use crate::models::message::{AttachmentRef, UploadedFile};
use crate::storage::ObjectStorage;

/// Declared type assumed when a client uploads without one.
const FALLBACK_MIME: &str = "application/octet-stream";

/// Turns an uploaded file into a durable attachment reference. The object
/// store upload completes before any message row exists, so a stored
/// reference never points at a missing object.
pub struct AttachmentPipeline<O> {
    storage: O,
}

impl<O: ObjectStorage> AttachmentPipeline<O> {
    pub fn new(storage: O) -> Self {
        Self { storage }
    }

    pub async fn store(&self, file: &UploadedFile) -> Result<AttachmentRef, ChatError> {
        let mime_type = if file.mime_type.trim().is_empty() {
            FALLBACK_MIME
        } else {
            file.mime_type.as_str()
        };

        let url = self
            .storage
            .put(&file.bytes, mime_type, &file.original_name)
            .await?;

        Ok(AttachmentRef {
            url,
            category: category_of(mime_type),
            original_name: file.original_name.clone(),
        })
    }
}

/// First segment of the declared media type: `image/png` becomes `image`.
/// Renderers treat every category except `image` as a plain document.
pub fn category_of(mime_type: &str) -> String {
    mime_type.split('/').next().unwrap_or_default().to_string()
}
