use uuid::Uuid;

use crate::error::ChatError;
use crate::models::appointment::Appointment;
use crate::models::caller::Caller;
use crate::repositories::AppointmentSource;

/// Decides whether a caller may act on a conversation. Membership is fixed
/// for the appointment's lifetime, so every decision re-resolves the
/// appointment instead of trusting anything in the request.
pub struct AccessGuard<A> {
    appointments: A,
}

impl<A: AppointmentSource> AccessGuard<A> {
    pub fn new(appointments: A) -> Self {
        Self { appointments }
    }

    /// Resolves the appointment behind `conversation_id` and checks that
    /// `caller` is the participant its role claims. Returns the appointment
    /// so callers can reuse the participant ids without a second lookup.
    pub async fn authorize(
        &self,
        conversation_id: Uuid,
        caller: &Caller,
    ) -> Result<Appointment, ChatError> {
        let appointment = self
            .appointments
            .lookup(conversation_id)
            .await?
            .ok_or(ChatError::NotFound)?;

        if appointment.participant(caller.role) != caller.id {
            return Err(ChatError::Unauthorized);
        }

        Ok(appointment)
    }
}
