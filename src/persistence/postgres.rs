//! PostgreSQL implementation of the persistence layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::models::{SnapshotRow, snapshot_from_rows, snapshot_rows};
use crate::domain::store::StoreSnapshot;
use crate::error::GameError;

fn db_error(e: impl std::fmt::Display) -> GameError {
    GameError::Persistence(e.to_string())
}

/// PostgreSQL-backed persistence layer using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresPersistence {
    pool: PgPool,
}

impl PostgresPersistence {
    /// Creates a new persistence layer with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations in `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns a [`GameError::Persistence`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), GameError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(db_error)
    }

    /// Appends an event to the event log.
    ///
    /// # Errors
    ///
    /// Returns a [`GameError::Persistence`] on database failure.
    pub async fn save_event(
        &self,
        user_id: Uuid,
        event_type: &str,
        payload: &serde_json::Value,
    ) -> Result<i64, GameError> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO events (user_id, event_type, payload) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(user_id)
        .bind(event_type)
        .bind(payload)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }

    /// Upserts every entity of `snapshot` in one transaction, so a reader
    /// never sees half of a snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`GameError::Persistence`] on encoding or database failure.
    pub async fn save_snapshot(&self, snapshot: &StoreSnapshot) -> Result<usize, GameError> {
        let rows = snapshot_rows(snapshot)?;
        let mut tx = self.pool.begin().await.map_err(db_error)?;
        for row in &rows {
            sqlx::query(
                "INSERT INTO entity_snapshots (kind, id, data, snapshot_at) \
                 VALUES ($1, $2, $3, now()) \
                 ON CONFLICT (kind, id) DO UPDATE SET data = EXCLUDED.data, snapshot_at = EXCLUDED.snapshot_at",
            )
            .bind(&row.kind)
            .bind(&row.id)
            .bind(&row.data)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }
        tx.commit().await.map_err(db_error)?;
        Ok(rows.len())
    }

    /// Loads the latest image of every stored entity.
    ///
    /// # Errors
    ///
    /// Returns a [`GameError::Persistence`] on database or decoding failure.
    pub async fn load_snapshot(&self) -> Result<StoreSnapshot, GameError> {
        let rows = sqlx::query_as::<_, (String, String, serde_json::Value)>(
            "SELECT kind, id, data FROM entity_snapshots ORDER BY kind, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        snapshot_from_rows(
            rows.into_iter()
                .map(|(kind, id, data)| SnapshotRow { kind, id, data })
                .collect(),
        )
    }

    /// Deletes event log rows older than the given number of days.
    ///
    /// # Errors
    ///
    /// Returns a [`GameError::Persistence`] on database failure.
    pub async fn delete_old_events(&self, before_days: u64) -> Result<u64, GameError> {
        let cutoff = i64::try_from(before_days)
            .ok()
            .and_then(chrono::Duration::try_days)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let result = sqlx::query("DELETE FROM events WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }
}
