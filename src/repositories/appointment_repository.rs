use std::sync::Arc;

use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::error::ChatError;
use crate::models::appointment::Appointment;
use crate::repositories::AppointmentSource;

/// Reads appointment records owned by the booking module. This subsystem
/// never writes to that table.
pub struct AppointmentRepository {
    pool: Arc<Pool>,
}

impl AppointmentRepository {
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool }
    }
}

impl AppointmentSource for AppointmentRepository {
    async fn lookup(&self, id: Uuid) -> Result<Option<Appointment>, ChatError> {
        let client = self
            .pool
            .get()
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))?;

        let query = "
            SELECT id, patient_id, provider_id, cancelled
            FROM appointments
            WHERE id = $1
        ";

        let row = client
            .query_opt(query, &[&id])
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))?;

        Ok(row.map(|row| Appointment {
            id: row.get(0),
            patient_id: row.get(1),
            provider_id: row.get(2),
            cancelled: row.get(3),
        }))
    }
}
