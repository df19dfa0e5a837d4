use tracing::info;
use uuid::Uuid;

use crate::error::ChatError;
use crate::models::caller::Caller;
use crate::models::message::{Message, NewMessage, UploadedFile};
use crate::repositories::{AppointmentSource, ConversationStore};
use crate::services::access_guard::AccessGuard;
use crate::services::attachment_pipeline::AttachmentPipeline;
use crate::storage::ObjectStorage;

/// Body recorded when a file is sent without any text.
pub const ATTACHMENT_PLACEHOLDER_BODY: &str = "Sent a file";

/// The message operations behind both chat surfaces. Holds no per-request
/// state; every operation authorizes against the appointment before it
/// touches the store.
pub struct ConversationService<S, A, O> {
    store: S,
    guard: AccessGuard<A>,
    pipeline: AttachmentPipeline<O>,
}

impl<S, A, O> ConversationService<S, A, O>
where
    S: ConversationStore,
    A: AppointmentSource,
    O: ObjectStorage,
{
    pub fn new(store: S, appointments: A, storage: O) -> Self {
        Self {
            store,
            guard: AccessGuard::new(appointments),
            pipeline: AttachmentPipeline::new(storage),
        }
    }

    /// The full history of a conversation, oldest first. Cancelled
    /// appointments keep their history readable.
    pub async fn list_messages(
        &self,
        conversation_id: Uuid,
        caller: &Caller,
    ) -> Result<Vec<Message>, ChatError> {
        self.guard.authorize(conversation_id, caller).await?;
        self.store.list_by_conversation(conversation_id).await
    }

    /// Appends a text message. Participant ids come from the appointment
    /// and the sender from the verified caller; the request payload never
    /// chooses either.
    pub async fn send_text(
        &self,
        conversation_id: Uuid,
        caller: &Caller,
        body: &str,
    ) -> Result<Message, ChatError> {
        let appointment = self.guard.authorize(conversation_id, caller).await?;
        if appointment.cancelled {
            return Err(ChatError::Conflict);
        }
        if body.trim().is_empty() {
            return Err(ChatError::InvalidArgument("Message text is required".to_string()));
        }

        let message = self
            .store
            .append(NewMessage {
                conversation_id,
                patient_id: appointment.patient_id,
                provider_id: appointment.provider_id,
                sender_id: caller.id,
                body: body.to_string(),
                attachment: None,
            })
            .await?;

        info!("message {} appended to conversation {}", message.id, conversation_id);
        Ok(message)
    }

    /// Uploads the file, then appends a message carrying the attachment
    /// reference. A failed upload leaves the conversation untouched; a
    /// failed append after the upload leaves an orphaned object behind,
    /// never a dangling reference.
    pub async fn send_attachment(
        &self,
        conversation_id: Uuid,
        caller: &Caller,
        file: &UploadedFile,
        body: Option<&str>,
    ) -> Result<Message, ChatError> {
        let appointment = self.guard.authorize(conversation_id, caller).await?;
        if appointment.cancelled {
            return Err(ChatError::Conflict);
        }
        if file.bytes.is_empty() {
            return Err(ChatError::InvalidArgument("No file uploaded".to_string()));
        }

        let attachment = self.pipeline.store(file).await?;
        let body = match body {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => ATTACHMENT_PLACEHOLDER_BODY.to_string(),
        };

        let message = self
            .store
            .append(NewMessage {
                conversation_id,
                patient_id: appointment.patient_id,
                provider_id: appointment.provider_id,
                sender_id: caller.id,
                body,
                attachment: Some(attachment),
            })
            .await?;

        info!(
            "attachment message {} appended to conversation {}",
            message.id, conversation_id
        );
        Ok(message)
    }
}
