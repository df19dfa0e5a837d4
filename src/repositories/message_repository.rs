use std::sync::Arc;

use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::error::ChatError;
use crate::models::message::{AttachmentRef, Message, NewMessage};
use crate::repositories::ConversationStore;

/// Postgres-backed message store. Rows are append-only; the `seq` column
/// preserves append order when two rows share a timestamp.
pub struct MessageRepository {
    pool: Arc<Pool>,
}

impl MessageRepository {
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }

    fn row_to_message(row: &Row) -> Message {
        let url: Option<String> = row.get(6);
        let category: Option<String> = row.get(7);
        let original_name: Option<String> = row.get(8);
        let attachment = url.map(|url| AttachmentRef {
            url,
            category: category.unwrap_or_default(),
            original_name: original_name.unwrap_or_default(),
        });

        Message {
            id: row.get(0),
            conversation_id: row.get(1),
            patient_id: row.get(2),
            provider_id: row.get(3),
            sender_id: row.get(4),
            body: row.get(5),
            attachment,
            created_at: row.get(9),
        }
    }
}

impl ConversationStore for MessageRepository {
    async fn append(&self, draft: NewMessage) -> Result<Message, ChatError> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))?;

        let query = "
            INSERT INTO messages
                (id, conversation_id, patient_id, provider_id, sender_id, body,
                 attachment_url, attachment_category, attachment_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, conversation_id, patient_id, provider_id, sender_id, body,
                      attachment_url, attachment_category, attachment_name, created_at
        ";

        let message_id = Uuid::new_v4();
        let attachment = draft.attachment.as_ref();
        let url = attachment.map(|a| a.url.as_str());
        let category = attachment.map(|a| a.category.as_str());
        let name = attachment.map(|a| a.original_name.as_str());

        let row = client
            .query_one(
                query,
                &[
                    &message_id,
                    &draft.conversation_id,
                    &draft.patient_id,
                    &draft.provider_id,
                    &draft.sender_id,
                    &draft.body,
                    &url,
                    &category,
                    &name,
                ],
            )
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))?;

        Ok(Self::row_to_message(&row))
    }

    async fn list_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<Message>, ChatError> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))?;

        let query = "
            SELECT id, conversation_id, patient_id, provider_id, sender_id, body,
                   attachment_url, attachment_category, attachment_name, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at, seq
        ";

        let rows = client
            .query(query, &[&conversation_id])
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_message).collect())
    }
}
