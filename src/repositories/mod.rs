pub mod appointment_repository;
pub mod message_repository;

pub use appointment_repository::AppointmentRepository;
pub use message_repository::MessageRepository;

use std::future::Future;

use uuid::Uuid;

use crate::error::ChatError;
use crate::models::appointment::Appointment;
use crate::models::message::{Message, NewMessage};

/// Durable, append-only message storage queryable per conversation.
pub trait ConversationStore: Send + Sync + 'static {
    /// Persists `draft`, assigning its id and creation time, and returns
    /// the stored form. Existing rows are never modified or deleted.
    fn append(&self, draft: NewMessage) -> impl Future<Output = Result<Message, ChatError>> + Send;

    /// Every message of a conversation in ascending creation order, append
    /// order breaking ties. Unknown conversations yield an empty list.
    fn list_by_conversation(
        &self,
        conversation_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Message>, ChatError>> + Send;
}

/// Read access to the appointment records backing conversations.
pub trait AppointmentSource: Send + Sync + 'static {
    fn lookup(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Appointment>, ChatError>> + Send;
}
