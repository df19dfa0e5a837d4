#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use chrono::Utc;
use uuid::Uuid;

use medibuddy_chat::app_state::AppState;
use medibuddy_chat::error::ChatError;
use medibuddy_chat::models::appointment::Appointment;
use medibuddy_chat::models::caller::Role;
use medibuddy_chat::models::message::{Message, NewMessage};
use medibuddy_chat::repositories::{AppointmentSource, ConversationStore};
use medibuddy_chat::routes::app_routes::create_router;
use medibuddy_chat::services::conversation_service::ConversationService;
use medibuddy_chat::services::jwt_service::{create_token, AuthKeys};
use medibuddy_chat::storage::ObjectStorage;

pub const TEST_SECRET: &[u8] = b"chat-test-secret";

/// In-memory `ConversationStore`. Listing sorts by creation time with a
/// stable sort, so equal timestamps keep their append order like the
/// `seq` column does.
#[derive(Clone, Default)]
pub struct MemoryStore {
    messages: Arc<Mutex<Vec<Message>>>,
}

impl MemoryStore {
    pub fn all(&self) -> Vec<Message> {
        self.messages.lock().unwrap().clone()
    }

    /// Seeds a fully-formed message, timestamps included.
    pub fn push_raw(&self, message: Message) {
        self.messages.lock().unwrap().push(message);
    }
}

impl ConversationStore for MemoryStore {
    async fn append(&self, draft: NewMessage) -> Result<Message, ChatError> {
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id: draft.conversation_id,
            patient_id: draft.patient_id,
            provider_id: draft.provider_id,
            sender_id: draft.sender_id,
            body: draft.body,
            attachment: draft.attachment,
            created_at: Utc::now(),
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn list_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<Message>, ChatError> {
        let messages = self.messages.lock().unwrap();
        let mut filtered: Vec<Message> = messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        filtered.sort_by_key(|m| m.created_at);
        Ok(filtered)
    }
}

#[derive(Clone, Default)]
pub struct MemoryAppointments {
    appointments: Arc<Mutex<HashMap<Uuid, Appointment>>>,
}

impl MemoryAppointments {
    pub fn insert(&self, appointment: Appointment) {
        self.appointments
            .lock()
            .unwrap()
            .insert(appointment.id, appointment);
    }

    pub fn cancel(&self, id: Uuid) {
        if let Some(appointment) = self.appointments.lock().unwrap().get_mut(&id) {
            appointment.cancelled = true;
        }
    }
}

impl AppointmentSource for MemoryAppointments {
    async fn lookup(&self, id: Uuid) -> Result<Option<Appointment>, ChatError> {
        Ok(self.appointments.lock().unwrap().get(&id).cloned())
    }
}

/// In-memory `ObjectStorage` with a switch to simulate an outage.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    failing: Arc<Mutex<bool>>,
}

impl MemoryStorage {
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

impl ObjectStorage for MemoryStorage {
    async fn put(
        &self,
        bytes: &[u8],
        _mime_type: &str,
        _original_name: &str,
    ) -> Result<String, ChatError> {
        if *self.failing.lock().unwrap() {
            return Err(ChatError::Upload("object store offline".to_string()));
        }

        let url = format!("mem://{}", Uuid::new_v4());
        self.objects.lock().unwrap().insert(url.clone(), bytes.to_vec());
        Ok(url)
    }
}

#[derive(Clone, Copy)]
pub struct Participants {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
}

pub fn seed_appointment(appointments: &MemoryAppointments) -> Participants {
    let participants = Participants {
        appointment_id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        provider_id: Uuid::new_v4(),
    };
    appointments.insert(Appointment {
        id: participants.appointment_id,
        patient_id: participants.patient_id,
        provider_id: participants.provider_id,
        cancelled: false,
    });
    participants
}

pub fn auth_keys() -> AuthKeys {
    AuthKeys::from_secret(TEST_SECRET)
}

pub fn token_for(keys: &AuthKeys, id: Uuid, role: Role) -> String {
    create_token(keys, id, role).unwrap()
}

/// A fully wired application over the in-memory doubles. The doubles are
/// cloned into the service but share state with the handles kept here.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub appointments: MemoryAppointments,
    pub storage: MemoryStorage,
    pub keys: AuthKeys,
    pub participants: Participants,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::default();
        let appointments = MemoryAppointments::default();
        let storage = MemoryStorage::default();
        let participants = seed_appointment(&appointments);
        let keys = auth_keys();

        let service =
            ConversationService::new(store.clone(), appointments.clone(), storage.clone());
        let router = create_router(AppState::new(service), keys.clone(), None);

        Self {
            router,
            store,
            appointments,
            storage,
            keys,
            participants,
        }
    }

    pub fn patient_token(&self) -> String {
        token_for(&self.keys, self.participants.patient_id, Role::Patient)
    }

    pub fn provider_token(&self) -> String {
        token_for(&self.keys, self.participants.provider_id, Role::Provider)
    }
}
