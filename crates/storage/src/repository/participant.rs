use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{EventConfig, EventId, ParticipantRecord, ParticipantRow, StartClass};

/// Repository for participant records. Every query is scoped to one event.
pub struct ParticipantRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ParticipantRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all participants of an event in registration order
    pub async fn list(&self, event: EventId) -> Result<Vec<ParticipantRow>> {
        let participants = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT participant_id, event, name, start_class, secret, registered_at, results
            FROM participants
            WHERE event = $1
            ORDER BY registered_at, participant_id
            "#,
        )
        .bind(event.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    /// Decoded snapshot of an event, the input of ranking and statistics
    pub async fn list_records(&self, config: &EventConfig) -> Result<Vec<ParticipantRecord>> {
        let rows = self.list(config.id).await?;

        Ok(rows
            .into_iter()
            .map(|row| ParticipantRecord::from_row(row, config))
            .collect())
    }

    /// Matches every accepted spelling of the class, e.g. `Männlich`
    pub async fn list_by_start_class(
        &self,
        event: EventId,
        start_class: StartClass,
    ) -> Result<Vec<ParticipantRow>> {
        let participants = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT participant_id, event, name, start_class, secret, registered_at, results
            FROM participants
            WHERE event = $1 AND start_class = ANY($2)
            ORDER BY registered_at, participant_id
            "#,
        )
        .bind(event.as_str())
        .bind(start_class.spellings())
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    /// Case-insensitive substring match on the name
    pub async fn search_by_name(&self, event: EventId, fragment: &str) -> Result<Vec<ParticipantRow>> {
        let pattern = format!("%{}%", escape_like(fragment));

        let participants = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT participant_id, event, name, start_class, secret, registered_at, results
            FROM participants
            WHERE event = $1 AND name ILIKE $2 ESCAPE '\'
            ORDER BY name, registered_at
            "#,
        )
        .bind(event.as_str())
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(participants)
    }

    pub async fn find_by_id(&self, event: EventId, id: Uuid) -> Result<ParticipantRow> {
        let participant = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT participant_id, event, name, start_class, secret, registered_at, results
            FROM participants
            WHERE event = $1 AND participant_id = $2
            "#,
        )
        .bind(event.as_str())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(participant)
    }

    /// Exact (case-insensitive) name plus matching secret
    pub async fn find_by_credentials(
        &self,
        event: EventId,
        name: &str,
        secret: &str,
    ) -> Result<Option<ParticipantRow>> {
        let participant = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT participant_id, event, name, start_class, secret, registered_at, results
            FROM participants
            WHERE event = $1 AND lower(name) = lower($2) AND secret = $3
            "#,
        )
        .bind(event.as_str())
        .bind(name.trim())
        .bind(secret)
        .fetch_optional(self.pool)
        .await?;

        Ok(participant)
    }

    pub async fn create(
        &self,
        event: EventId,
        name: &str,
        start_class: StartClass,
        secret: &str,
        results: &serde_json::Value,
    ) -> Result<ParticipantRow> {
        let participant = sqlx::query_as::<_, ParticipantRow>(
            r#"
            INSERT INTO participants (event, name, start_class, secret, results)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING participant_id, event, name, start_class, secret, registered_at, results
            "#,
        )
        .bind(event.as_str())
        .bind(name.trim())
        .bind(start_class.as_str())
        .bind(secret)
        .bind(sqlx::types::Json(results))
        .fetch_one(self.pool)
        .await
        .map_err(StorageError::from)
        .map_err(|e| {
            if e.is_unique_violation() {
                StorageError::ConstraintViolation(
                    "A participant with this secret already exists".to_string(),
                )
            } else {
                e
            }
        })?;

        Ok(participant)
    }

    /// Read-modify-write of the result payload under a row lock.
    ///
    /// `apply` receives the locked row and returns the new payload; an error
    /// from it rolls the transaction back.
    pub async fn update_results<F>(&self, event: EventId, id: Uuid, apply: F) -> Result<ParticipantRow>
    where
        F: FnOnce(&ParticipantRow) -> Result<serde_json::Value> + Send,
    {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, ParticipantRow>(
            r#"
            SELECT participant_id, event, name, start_class, secret, registered_at, results
            FROM participants
            WHERE event = $1 AND participant_id = $2
            FOR UPDATE
            "#,
        )
        .bind(event.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        let results = apply(&current)?;

        let updated = sqlx::query_as::<_, ParticipantRow>(
            r#"
            UPDATE participants
            SET results = $3
            WHERE event = $1 AND participant_id = $2
            RETURNING participant_id, event, name, start_class, secret, registered_at, results
            "#,
        )
        .bind(event.as_str())
        .bind(id)
        .bind(sqlx::types::Json(&results))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    pub async fn delete(&self, event: EventId, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM participants WHERE event = $1 AND participant_id = $2")
            .bind(event.as_str())
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
