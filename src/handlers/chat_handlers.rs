use axum::{
    extract::{rejection::JsonRejection, Multipart},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::ChatError;
use crate::models::caller::Caller;
use crate::models::message::{
    ListMessagesRequest, MessagesResponse, SendMessageRequest, SentMessageResponse, UploadedFile,
};
use crate::repositories::{AppointmentSource, ConversationStore};
use crate::storage::ObjectStorage;

/// POST `.../messages`. Returns the conversation history of one
/// appointment, oldest message first.
pub async fn get_messages<S, A, O>(
    Extension(state): Extension<AppState<S, A, O>>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<ListMessagesRequest>, JsonRejection>,
) -> Response
where
    S: ConversationStore,
    A: AppointmentSource,
    O: ObjectStorage,
{
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(e) => return bad_json(e).into_response(),
    };

    match state
        .service
        .list_messages(payload.conversation_id, &caller)
        .await
    {
        Ok(messages) => (StatusCode::OK, Json(MessagesResponse::new(messages))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST `.../send`. Appends a text message as the authenticated caller.
pub async fn send_message<S, A, O>(
    Extension(state): Extension<AppState<S, A, O>>,
    Extension(caller): Extension<Caller>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Response
where
    S: ConversationStore,
    A: AppointmentSource,
    O: ObjectStorage,
{
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(e) => return bad_json(e).into_response(),
    };

    match state
        .service
        .send_text(payload.conversation_id, &caller, &payload.body)
        .await
    {
        Ok(message) => (StatusCode::OK, Json(SentMessageResponse::new(message))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST `.../send-file`. Multipart upload carrying the file and an
/// optional text body.
pub async fn send_file_message<S, A, O>(
    Extension(state): Extension<AppState<S, A, O>>,
    Extension(caller): Extension<Caller>,
    multipart: Multipart,
) -> Response
where
    S: ConversationStore,
    A: AppointmentSource,
    O: ObjectStorage,
{
    let form = match read_send_file_form(multipart).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let Some(conversation_id) = form.conversation_id else {
        return ChatError::InvalidArgument("conversationId is required".to_string())
            .into_response();
    };
    let Some(file) = form.file else {
        return ChatError::InvalidArgument("No file uploaded".to_string()).into_response();
    };

    match state
        .service
        .send_attachment(conversation_id, &caller, &file, form.body.as_deref())
        .await
    {
        Ok(message) => (StatusCode::OK, Json(SentMessageResponse::new(message))).into_response(),
        Err(e) => e.into_response(),
    }
}

#[derive(Default)]
struct SendFileForm {
    conversation_id: Option<Uuid>,
    body: Option<String>,
    file: Option<UploadedFile>,
}

/// Pulls the recognised fields out of the multipart form. Unknown fields,
/// a client-supplied `senderId` among them, are drained and ignored.
async fn read_send_file_form(mut multipart: Multipart) -> Result<SendFileForm, ChatError> {
    let mut form = SendFileForm::default();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        // Owned copy; reading the field content consumes it.
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("conversationId") => {
                let text = field.text().await.map_err(bad_multipart)?;
                let id = Uuid::parse_str(text.trim()).map_err(|_| {
                    ChatError::InvalidArgument("conversationId must be a UUID".to_string())
                })?;
                form.conversation_id = Some(id);
            }
            Some("body") => {
                form.body = Some(field.text().await.map_err(bad_multipart)?);
            }
            Some("file") => {
                let mime_type = field.content_type().map(str::to_string).unwrap_or_default();
                let original_name = field.file_name().map(str::to_string).unwrap_or_default();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                form.file = Some(UploadedFile {
                    bytes: bytes.to_vec(),
                    mime_type,
                    original_name,
                });
            }
            _ => {
                let _ = field.bytes().await;
            }
        }
    }

    Ok(form)
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> ChatError {
    ChatError::InvalidArgument(format!("Malformed upload: {}", err))
}

fn bad_json(err: JsonRejection) -> ChatError {
    ChatError::InvalidArgument(format!("Malformed request: {}", err))
}
