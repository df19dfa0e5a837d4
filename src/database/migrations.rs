use tokio_postgres::Client;

// Applies the chat schema. Every statement is idempotent so startup can
// run them unconditionally.
pub async fn apply_migrations(client: &Client) -> Result<(), String> {
    // Appointments are created and cancelled by the booking module; the
    // chat subsystem only ever reads this table.
    let create_appointments_table_query = "
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY,
            patient_id UUID NOT NULL,
            provider_id UUID NOT NULL,
            cancelled BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    ";
    client
        .execute(create_appointments_table_query, &[])
        .await
        .map_err(|e| format!("Error creating appointments table: {}", e))?;

    // Messages are append-only. `seq` keeps the append order when two rows
    // share a created_at value.
    let create_messages_table_query = "
        CREATE TABLE IF NOT EXISTS messages (
            id UUID PRIMARY KEY,
            seq BIGSERIAL,
            conversation_id UUID NOT NULL REFERENCES appointments(id),
            patient_id UUID NOT NULL,
            provider_id UUID NOT NULL,
            sender_id UUID NOT NULL,
            body TEXT NOT NULL,
            attachment_url TEXT,
            attachment_category VARCHAR(64),
            attachment_name TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
    ";
    client
        .execute(create_messages_table_query, &[])
        .await
        .map_err(|e| format!("Error creating messages table: {}", e))?;

    let create_messages_index_query = "
        CREATE INDEX IF NOT EXISTS messages_conversation_order_idx
        ON messages (conversation_id, created_at, seq)
    ";
    client
        .execute(create_messages_index_query, &[])
        .await
        .map_err(|e| format!("Error creating messages index: {}", e))?;

    Ok(())
}
