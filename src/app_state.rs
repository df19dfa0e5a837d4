// app_state.rs

use std::sync::Arc;

use crate::repositories::{AppointmentSource, ConversationStore};
use crate::services::conversation_service::ConversationService;
use crate::storage::ObjectStorage;

/// Application state containing shared resources. The extension layer
/// clones it per request, hence the `Arc`.
pub struct AppState<S, A, O> {
    pub service: Arc<ConversationService<S, A, O>>,
}

impl<S, A, O> AppState<S, A, O>
where
    S: ConversationStore,
    A: AppointmentSource,
    O: ObjectStorage,
{
    pub fn new(service: ConversationService<S, A, O>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

impl<S, A, O> Clone for AppState<S, A, O> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}
