use std::future::Future;

use reqwest::multipart;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::caller::Role;
use crate::models::message::{ListMessagesRequest, Message, SendMessageRequest, UploadedFile};

/// Failures surfaced by the remote conversation API.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a usable response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a failure envelope.
    #[error("{0}")]
    Rejected(String),

    /// The response body did not match the wire contract.
    #[error("Malformed response: {0}")]
    Decode(String),
}

/// The remote conversation operations a view polls and sends through.
pub trait ConversationApi: Send + Sync + 'static {
    fn fetch_messages(
        &self,
        conversation_id: Uuid,
    ) -> impl Future<Output = Result<Vec<Message>, ClientError>> + Send;

    fn send_text(
        &self,
        conversation_id: Uuid,
        body: &str,
    ) -> impl Future<Output = Result<Message, ClientError>> + Send;

    fn send_file(
        &self,
        conversation_id: Uuid,
        file: &UploadedFile,
        body: Option<&str>,
    ) -> impl Future<Output = Result<Message, ClientError>> + Send;
}

/// HTTP client for one chat surface. The role picks the route prefix and
/// must match the role baked into the bearer token.
pub struct HttpConversationApi {
    http: reqwest::Client,
    base_url: String,
    role: Role,
    token: String,
}

impl HttpConversationApi {
    pub fn new(base_url: impl Into<String>, role: Role, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            role,
            token: token.into(),
        }
    }

    fn endpoint(&self, operation: &str) -> String {
        format!(
            "{}/api/chat/{}/{}",
            self.base_url,
            self.role.as_str(),
            operation
        )
    }
}

impl ConversationApi for HttpConversationApi {
    async fn fetch_messages(&self, conversation_id: Uuid) -> Result<Vec<Message>, ClientError> {
        let response = self
            .http
            .post(self.endpoint("messages"))
            .bearer_auth(&self.token)
            .json(&ListMessagesRequest { conversation_id })
            .send()
            .await?;

        parse_messages(response).await
    }

    async fn send_text(&self, conversation_id: Uuid, body: &str) -> Result<Message, ClientError> {
        let response = self
            .http
            .post(self.endpoint("send"))
            .bearer_auth(&self.token)
            .json(&SendMessageRequest {
                conversation_id,
                body: body.to_string(),
            })
            .send()
            .await?;

        parse_message(response).await
    }

    async fn send_file(
        &self,
        conversation_id: Uuid,
        file: &UploadedFile,
        body: Option<&str>,
    ) -> Result<Message, ClientError> {
        let mime_type = if file.mime_type.trim().is_empty() {
            "application/octet-stream"
        } else {
            file.mime_type.as_str()
        };
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.original_name.clone())
            .mime_str(mime_type)?;

        let mut form = multipart::Form::new()
            .text("conversationId", conversation_id.to_string())
            .part("file", part);
        if let Some(text) = body {
            form = form.text("body", text.to_string());
        }

        let response = self
            .http
            .post(self.endpoint("send-file"))
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;

        parse_message(response).await
    }
}

/// Response envelope shared by every chat route. `message` is the stored
/// message on success and the failure text otherwise.
#[derive(Deserialize)]
struct ApiEnvelope {
    success: bool,
    #[serde(default)]
    messages: Option<Vec<Message>>,
    #[serde(default)]
    message: Option<Value>,
}

async fn read_envelope(response: reqwest::Response) -> Result<ApiEnvelope, ClientError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

fn rejection_message(envelope: &ApiEnvelope) -> String {
    match &envelope.message {
        Some(Value::String(text)) => text.clone(),
        _ => "Request rejected".to_string(),
    }
}

async fn parse_messages(response: reqwest::Response) -> Result<Vec<Message>, ClientError> {
    let envelope = read_envelope(response).await?;
    if !envelope.success {
        return Err(ClientError::Rejected(rejection_message(&envelope)));
    }

    envelope
        .messages
        .ok_or_else(|| ClientError::Decode("Response carried no messages".to_string()))
}

async fn parse_message(response: reqwest::Response) -> Result<Message, ClientError> {
    let envelope = read_envelope(response).await?;
    if !envelope.success {
        return Err(ClientError::Rejected(rejection_message(&envelope)));
    }

    let value = envelope
        .message
        .ok_or_else(|| ClientError::Decode("Response carried no message".to_string()))?;
    serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
}
