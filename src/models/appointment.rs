use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::caller::Role;

/// The slice of an appointment record this subsystem reads. Appointments
/// are created and cancelled by the booking module; a conversation borrows
/// the appointment id and its two participant identities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub provider_id: Uuid,
    pub cancelled: bool,
}

impl Appointment {
    /// The participant identity expected for `role`.
    pub fn participant(&self, role: Role) -> Uuid {
        match role {
            Role::Patient => self.patient_id,
            Role::Provider => self.provider_id,
        }
    }
}
