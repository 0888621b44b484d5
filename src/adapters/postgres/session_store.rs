//! PostgreSQL implementation of the session ports.
//!
//! Schema lives in `migrations/`. `session_logs` marks which sessions have an
//! event log at all, so a log with zero events can be told apart from an
//! unknown session.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::Row;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::foundation::{DomainError, ErrorCode, SessionId, Timestamp};
use crate::domain::session::{SessionEvent, SessionMetadata};
use crate::ports::{SessionRepository, SessionWriter};

/// PostgreSQL implementation of SessionRepository and SessionWriter.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects using the configured pool settings, running migrations if enabled.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .max_lifetime(Some(config.max_lifetime()))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::database(format!("Failed to connect to PostgreSQL: {}", e)))?;

        if config.run_migrations {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| DomainError::database(format!("Failed to run migrations: {}", e)))?;
            info!("Database migrations applied");
        }

        Ok(Self::new(pool))
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SessionRepository for PostgresSessionStore {
    async fn get_events(&self, id: &SessionId) -> Result<Option<Vec<SessionEvent>>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT e.payload
            FROM session_logs l
            LEFT JOIN session_events e ON e.session_id = l.session_id
            WHERE l.session_id = $1
            ORDER BY e.seq ASC
            "#,
        )
        .bind(id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch session events: {}", e)))?;

        // No log row at all: the session is unknown
        if rows.is_empty() {
            return Ok(None);
        }

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let payload: Option<Value> = row.try_get("payload").map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to get payload: {}", e),
                )
            })?;
            // The LEFT JOIN yields a single NULL payload for an empty log
            if let Some(payload) = payload {
                events.push(SessionEvent::new(payload));
            }
        }

        Ok(Some(events))
    }

    async fn get_metadata(&self, id: &SessionId) -> Result<Option<SessionMetadata>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT session_id, started_at, duration_ms, attributes
            FROM session_metadata
            WHERE session_id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to fetch session metadata: {}", e)))?;

        row.map(row_to_session_metadata).transpose()
    }

    async fn list_metadata(
        &self,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<SessionMetadata>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT session_id, started_at, duration_ms, attributes
            FROM session_metadata
            ORDER BY started_at DESC NULLS LAST, session_id COLLATE "C" ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list session metadata: {}", e)))?;

        rows.into_iter().map(row_to_session_metadata).collect()
    }
}

#[async_trait]
impl SessionWriter for PostgresSessionStore {
    async fn append_events(
        &self,
        id: &SessionId,
        events: &[SessionEvent],
    ) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query("INSERT INTO session_logs (session_id) VALUES ($1) ON CONFLICT DO NOTHING")
            .bind(id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database(format!("Failed to create session log: {}", e)))?;

        for event in events {
            sqlx::query("INSERT INTO session_events (session_id, payload) VALUES ($1, $2)")
                .bind(id.as_str())
                .bind(Json(event.payload()))
                .execute(&mut *tx)
                .await
                .map_err(|e| DomainError::database(format!("Failed to append event: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::database(format!("Failed to commit events: {}", e)))?;

        Ok(())
    }

    async fn save_metadata(&self, metadata: &SessionMetadata) -> Result<(), DomainError> {
        let duration_ms = metadata.duration_ms.map(duration_to_column).transpose()?;

        sqlx::query(
            r#"
            INSERT INTO session_metadata (session_id, started_at, duration_ms, attributes, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT (session_id) DO UPDATE SET
                started_at = EXCLUDED.started_at,
                duration_ms = EXCLUDED.duration_ms,
                attributes = EXCLUDED.attributes,
                updated_at = NOW()
            "#,
        )
        .bind(metadata.session_id.as_str())
        .bind(metadata.started_at.map(|ts| *ts.as_datetime()))
        .bind(duration_ms)
        .bind(Json(&metadata.attributes))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save session metadata: {}", e)))?;

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn duration_to_column(duration_ms: u64) -> Result<i64, DomainError> {
    i64::try_from(duration_ms).map_err(|_| {
        DomainError::new(
            ErrorCode::InvalidFormat,
            format!("duration_ms out of range: {}", duration_ms),
        )
    })
}

fn duration_from_column(duration_ms: i64) -> Result<u64, DomainError> {
    u64::try_from(duration_ms).map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Negative duration_ms in database: {}", duration_ms),
        )
    })
}

fn attributes_from_value(value: Value) -> Result<Map<String, Value>, DomainError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(DomainError::serialization(format!(
            "Session attributes must be a JSON object, got {}",
            other
        ))),
    }
}

fn row_to_session_metadata(row: PgRow) -> Result<SessionMetadata, DomainError> {
    let session_id: String = row.try_get("session_id").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get session_id: {}", e),
        )
    })?;

    let started_at: Option<chrono::DateTime<chrono::Utc>> =
        row.try_get("started_at").map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to get started_at: {}", e),
            )
        })?;

    let duration_ms: Option<i64> = row.try_get("duration_ms").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get duration_ms: {}", e),
        )
    })?;

    let attributes: Value = row.try_get("attributes").map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get attributes: {}", e),
        )
    })?;

    Ok(SessionMetadata {
        started_at: started_at.map(Timestamp::from_datetime),
        duration_ms: duration_ms.map(duration_from_column).transpose()?,
        ..SessionMetadata::new(SessionId::new(session_id))
    }
    .with_attributes(attributes_from_value(attributes)?))
}
