use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single entry in an appointment's conversation. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentRef>,
    pub created_at: DateTime<Utc>,
}

/// Durable pointer to an uploaded file, recorded on the owning message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub url: String,
    pub category: String,
    pub original_name: String,
}

impl AttachmentRef {
    /// Anything that is not an image renders as a plain document link.
    pub fn is_image(&self) -> bool {
        self.category == "image"
    }
}

/// Input to `ConversationStore::append`. The store assigns the id and the
/// creation time of the resulting row.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub conversation_id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub attachment: Option<AttachmentRef>,
}

/// An uploaded file as it arrives from the transport layer.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub original_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMessagesRequest {
    pub conversation_id: Uuid,
}

/// Body for the send route. Older clients also post a `senderId` field;
/// it is ignored, the sender is always the authenticated caller.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub conversation_id: Uuid,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesResponse {
    pub success: bool,
    pub messages: Vec<Message>,
}

impl MessagesResponse {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            success: true,
            messages,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SentMessageResponse {
    pub success: bool,
    pub message: Message,
}

impl SentMessageResponse {
    pub fn new(message: Message) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample_message() -> Message {
        Message {
            id: Uuid::new_v4(),
            conversation_id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            provider_id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            body: "hello".to_string(),
            attachment: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn message_serializes_with_camel_case_keys() {
        let message = sample_message();
        let value = serde_json::to_value(&message).unwrap();

        assert!(value.get("conversationId").is_some());
        assert!(value.get("patientId").is_some());
        assert!(value.get("providerId").is_some());
        assert!(value.get("senderId").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("conversation_id").is_none());
    }

    #[test]
    fn attachment_is_omitted_when_absent() {
        let message = sample_message();
        let value = serde_json::to_value(&message).unwrap();

        assert!(value.get("attachment").is_none());
    }

    #[test]
    fn attachment_keeps_original_name_on_the_wire() {
        let mut message = sample_message();
        message.attachment = Some(AttachmentRef {
            url: "/uploads/abc.png".to_string(),
            category: "image".to_string(),
            original_name: "scan.png".to_string(),
        });

        let value = serde_json::to_value(&message).unwrap();
        let attachment = value.get("attachment").unwrap();
        assert_eq!(attachment.get("url").unwrap(), "/uploads/abc.png");
        assert_eq!(attachment.get("originalName").unwrap(), "scan.png");
    }

    #[test]
    fn send_request_ignores_forged_sender_field() {
        let payload = json!({
            "conversationId": Uuid::new_v4().to_string(),
            "body": "hi",
            "senderId": Uuid::new_v4().to_string(),
        });

        let request: SendMessageRequest = serde_json::from_value(payload).unwrap();
        assert_eq!(request.body, "hi");
    }

    #[test]
    fn image_categories_render_as_images() {
        let image = AttachmentRef {
            url: "/uploads/a.png".to_string(),
            category: "image".to_string(),
            original_name: "a.png".to_string(),
        };
        let document = AttachmentRef {
            url: "/uploads/b.pdf".to_string(),
            category: "application".to_string(),
            original_name: "b.pdf".to_string(),
        };

        assert!(image.is_image());
        assert!(!document.is_image());
    }

    #[test]
    fn error_envelope_is_flagged_unsuccessful() {
        let value: Value = serde_json::to_value(ErrorResponse::new("Appointment not found")).unwrap();
        assert_eq!(value.get("success").unwrap(), false);
        assert_eq!(value.get("message").unwrap(), "Appointment not found");
    }
}
