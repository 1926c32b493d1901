//! Snapshot rows and their conversion to and from the store.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::store::StoreSnapshot;
use crate::error::GameError;

/// `kind` column value for users.
pub const KIND_USER: &str = "user";
/// `kind` column value for pets.
pub const KIND_PET: &str = "pet";
/// `kind` column value for daily task sets.
pub const KIND_DAILY_TASKS: &str = "daily_tasks";
/// `kind` column value for minigame progress rows.
pub const KIND_GAME_PROGRESS: &str = "game_progress";

/// One row of the `entity_snapshots` table: the latest JSON image of a
/// single entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Entity family, one of the `KIND_*` constants.
    pub kind: String,
    /// Entity key within its family.
    pub id: String,
    /// Full entity as JSONB.
    pub data: serde_json::Value,
}

impl SnapshotRow {
    fn encode<T: Serialize>(kind: &str, id: String, entity: &T) -> Result<Self, GameError> {
        let data = serde_json::to_value(entity)
            .map_err(|e| GameError::Persistence(format!("encode {kind} {id}: {e}")))?;
        Ok(Self {
            kind: kind.to_string(),
            id,
            data,
        })
    }

    fn decode<T: DeserializeOwned>(self) -> Result<T, GameError> {
        serde_json::from_value(self.data)
            .map_err(|e| GameError::Persistence(format!("decode {} {}: {e}", self.kind, self.id)))
    }
}

/// Flattens a store snapshot into table rows.
///
/// # Errors
///
/// Returns [`GameError::Persistence`] if an entity fails to serialize.
pub fn snapshot_rows(snapshot: &StoreSnapshot) -> Result<Vec<SnapshotRow>, GameError> {
    let mut rows = Vec::with_capacity(
        snapshot.users.len()
            + snapshot.pets.len()
            + snapshot.daily_tasks.len()
            + snapshot.progress.len(),
    );
    for user in &snapshot.users {
        rows.push(SnapshotRow::encode(KIND_USER, user.id.to_string(), user)?);
    }
    for pet in &snapshot.pets {
        rows.push(SnapshotRow::encode(KIND_PET, pet.id.to_string(), pet)?);
    }
    for set in &snapshot.daily_tasks {
        rows.push(SnapshotRow::encode(KIND_DAILY_TASKS, set.id.to_string(), set)?);
    }
    for row in &snapshot.progress {
        let key = format!("{}:{}", row.user_id, row.game_id);
        rows.push(SnapshotRow::encode(KIND_GAME_PROGRESS, key, row)?);
    }
    Ok(rows)
}

/// Rebuilds a store snapshot from table rows. Unknown kinds are skipped
/// with a warning.
///
/// # Errors
///
/// Returns [`GameError::Persistence`] if a row fails to deserialize.
pub fn snapshot_from_rows(rows: Vec<SnapshotRow>) -> Result<StoreSnapshot, GameError> {
    let mut snapshot = StoreSnapshot::default();
    for row in rows {
        match row.kind.as_str() {
            KIND_USER => snapshot.users.push(row.decode()?),
            KIND_PET => snapshot.pets.push(row.decode()?),
            KIND_DAILY_TASKS => snapshot.daily_tasks.push(row.decode()?),
            KIND_GAME_PROGRESS => snapshot.progress.push(row.decode()?),
            other => tracing::warn!(kind = other, id = %row.id, "skipping unknown snapshot kind"),
        }
    }
    Ok(snapshot)
}
