// src/routes/app_routes.rs

use std::path::PathBuf;

use axum::middleware::from_fn;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::handlers::chat_handlers::{get_messages, send_file_message, send_message};
use crate::middleware::auth_middleware::{patient_auth_middleware, provider_auth_middleware};
use crate::repositories::{AppointmentSource, ConversationStore};
use crate::services::jwt_service::AuthKeys;
use crate::storage::ObjectStorage;

/// Assembles the two role-scoped chat surfaces. Both share their handlers;
/// only the authentication middleware differs. With `uploads_dir` set the
/// stored attachments are served read-only under `/uploads`.
pub fn create_router<S, A, O>(
    state: AppState<S, A, O>,
    keys: AuthKeys,
    uploads_dir: Option<PathBuf>,
) -> Router
where
    S: ConversationStore,
    A: AppointmentSource,
    O: ObjectStorage,
{
    let patient = Router::new()
        .route("/messages", post(get_messages::<S, A, O>))
        .route("/send", post(send_message::<S, A, O>))
        .route("/send-file", post(send_file_message::<S, A, O>))
        .route_layer(from_fn(patient_auth_middleware));

    let provider = Router::new()
        .route("/messages", post(get_messages::<S, A, O>))
        .route("/send", post(send_message::<S, A, O>))
        .route("/send-file", post(send_file_message::<S, A, O>))
        .route_layer(from_fn(provider_auth_middleware));

    let mut router = Router::new()
        .route("/", get(|| async { "API Working" }))
        .nest("/api/chat/patient", patient)
        .nest("/api/chat/provider", provider);

    if let Some(dir) = uploads_dir {
        router = router.nest_service("/uploads", ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
        .layer(Extension(keys))
}
