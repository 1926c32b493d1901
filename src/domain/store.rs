//! In-process game state: entity registries plus lookup indexes.
//!
//! Entities live in [`Registry`]s with one lock each. The secondary
//! indexes (unique e-mail and username, pets by owner, task sets by day)
//! share a single lock that is only held for map bookkeeping, never while
//! an entity lock is awaited.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::daily_task::DailyTaskSet;
use super::ids::{DailyTaskId, PetId, UserId};
use super::minigame::{GameKey, GameProgress, GameSession};
use super::pet::Pet;
use super::registry::{Entity, Registry, Shared};
use super::user::User;
use crate::error::GameError;

#[derive(Debug, Default)]
struct Indexes {
    emails: HashMap<String, UserId>,
    usernames: HashMap<String, UserId>,
    pets_by_owner: HashMap<UserId, Vec<PetId>>,
    tasks_by_day: HashMap<(UserId, NaiveDate), DailyTaskId>,
}

impl Indexes {
    fn add_user(&mut self, user: &User) {
        self.emails.insert(user.email.clone(), user.id);
        self.usernames.insert(user.username.to_lowercase(), user.id);
    }

    fn add_pet(&mut self, pet: &Pet) {
        let owned = self.pets_by_owner.entry(pet.owner).or_default();
        if !owned.contains(&pet.id) {
            owned.push(pet.id);
        }
    }
}

/// Serializable image of the whole store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// All users.
    pub users: Vec<User>,
    /// All pets.
    pub pets: Vec<Pet>,
    /// All daily task sets.
    pub daily_tasks: Vec<DailyTaskSet>,
    /// All minigame progress rows.
    pub progress: Vec<GameProgress>,
}

/// Every piece of mutable game state.
#[derive(Debug, Default)]
pub struct GameStore {
    users: Registry<User>,
    pets: Registry<Pet>,
    daily_tasks: Registry<DailyTaskSet>,
    indexes: RwLock<Indexes>,
    progress: RwLock<HashMap<GameKey, GameProgress>>,
    sessions: RwLock<HashMap<GameKey, GameSession>>,
}

impl GameStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new user, enforcing unique e-mail and username.
    ///
    /// # Errors
    ///
    /// [`GameError::Conflict`] if either is taken.
    pub async fn insert_user(&self, user: User) -> Result<Shared<User>, GameError> {
        let mut indexes = self.indexes.write().await;
        if indexes.emails.contains_key(&user.email) {
            return Err(GameError::Conflict("email already registered".to_string()));
        }
        if indexes.usernames.contains_key(&user.username.to_lowercase()) {
            return Err(GameError::Conflict("username already taken".to_string()));
        }
        indexes.add_user(&user);
        self.users.insert(user).await
    }

    /// Moves a user's e-mail and username index entries.
    ///
    /// `old` and `new` are `(username, email)` pairs; e-mails are expected
    /// lower-cased. Values held by the same user are not conflicts.
    ///
    /// # Errors
    ///
    /// [`GameError::Conflict`] if another user holds either new value.
    pub async fn reindex_user(
        &self,
        id: UserId,
        old: (&str, &str),
        new: (&str, &str),
    ) -> Result<(), GameError> {
        let (old_username, old_email) = (old.0.to_lowercase(), old.1);
        let (new_username, new_email) = (new.0.to_lowercase(), new.1);
        let mut indexes = self.indexes.write().await;
        if indexes.emails.get(new_email).is_some_and(|owner| *owner != id) {
            return Err(GameError::Conflict("email already registered".to_string()));
        }
        if indexes
            .usernames
            .get(&new_username)
            .is_some_and(|owner| *owner != id)
        {
            return Err(GameError::Conflict("username already taken".to_string()));
        }
        indexes.emails.remove(old_email);
        indexes.usernames.remove(&old_username);
        indexes.emails.insert(new_email.to_string(), id);
        indexes.usernames.insert(new_username, id);
        Ok(())
    }

    /// Looks up a user.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if absent.
    pub async fn user(&self, id: UserId) -> Result<Shared<User>, GameError> {
        self.users.get(id).await
    }

    /// Resolves a lower-cased e-mail address.
    pub async fn user_id_by_email(&self, email: &str) -> Option<UserId> {
        self.indexes.read().await.emails.get(email).copied()
    }

    /// Number of registered users.
    pub async fn user_count(&self) -> usize {
        self.users.len().await
    }

    /// Adds a new pet and indexes it under its owner.
    ///
    /// # Errors
    ///
    /// [`GameError::Conflict`] on an id collision.
    pub async fn insert_pet(&self, pet: Pet) -> Result<Shared<Pet>, GameError> {
        let mut indexes = self.indexes.write().await;
        indexes.add_pet(&pet);
        self.pets.insert(pet).await
    }

    /// Looks up a pet owned by `owner`.
    ///
    /// Pets of other users are reported as missing.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if absent or owned by someone else.
    pub async fn owned_pet(&self, owner: UserId, id: PetId) -> Result<Shared<Pet>, GameError> {
        let owned = self
            .indexes
            .read()
            .await
            .pets_by_owner
            .get(&owner)
            .is_some_and(|ids| ids.contains(&id));
        if !owned {
            return Err(GameError::not_found("pet", id));
        }
        self.pets.get(id).await
    }

    /// Ids of the pets owned by `owner`, in adoption order.
    pub async fn pet_ids_of(&self, owner: UserId) -> Vec<PetId> {
        self.indexes
            .read()
            .await
            .pets_by_owner
            .get(&owner)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of pets.
    pub async fn pet_count(&self) -> usize {
        self.pets.len().await
    }

    /// The task set of `user` for `date`, if one exists.
    pub async fn daily_tasks_on(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> Option<Shared<DailyTaskSet>> {
        let id = self
            .indexes
            .read()
            .await
            .tasks_by_day
            .get(&(user, date))
            .copied()?;
        self.daily_tasks.get(id).await.ok()
    }

    /// The task set of `user` for `date`, generated if absent.
    ///
    /// # Errors
    ///
    /// [`GameError::Conflict`] on an id collision.
    pub async fn daily_tasks_or_create(
        &self,
        user: UserId,
        date: NaiveDate,
    ) -> Result<Shared<DailyTaskSet>, GameError> {
        let mut indexes = self.indexes.write().await;
        if let Some(id) = indexes.tasks_by_day.get(&(user, date)).copied() {
            return self.daily_tasks.get(id).await;
        }
        let set = DailyTaskSet::generate(user, date);
        indexes.tasks_by_day.insert((user, date), set.id);
        self.daily_tasks.insert(set).await
    }

    /// A task set by id, checked against its owner.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if absent or owned by someone else.
    pub async fn owned_daily_tasks(
        &self,
        user: UserId,
        id: DailyTaskId,
    ) -> Result<Shared<DailyTaskSet>, GameError> {
        let shared = self.daily_tasks.get(id).await?;
        if shared.read().await.user_id != user {
            return Err(GameError::not_found(DailyTaskSet::KIND, id));
        }
        Ok(shared)
    }

    /// Opens (or restarts) the session for `key`.
    pub async fn open_session(&self, session: GameSession) {
        let key = (session.user_id, session.game_id.clone());
        self.sessions.write().await.insert(key, session);
    }

    /// Removes and returns the open session for `key`.
    pub async fn take_session(&self, key: &GameKey) -> Option<GameSession> {
        self.sessions.write().await.remove(key)
    }

    /// Progress row for `key`, if the game was ever finished.
    pub async fn progress(&self, key: &GameKey) -> Option<GameProgress> {
        self.progress.read().await.get(key).cloned()
    }

    /// Applies `update` to the progress row for `key`, creating it first.
    pub async fn update_progress<F>(&self, key: GameKey, update: F) -> GameProgress
    where
        F: FnOnce(&mut GameProgress),
    {
        let mut map = self.progress.write().await;
        let row = map
            .entry(key.clone())
            .or_insert_with(|| GameProgress::new(key.0, &key.1));
        update(row);
        row.clone()
    }

    /// All progress rows of `user`, ordered by game id.
    pub async fn progress_of(&self, user: UserId) -> Vec<GameProgress> {
        let mut rows: Vec<GameProgress> = self
            .progress
            .read()
            .await
            .values()
            .filter(|p| p.user_id == user)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.game_id.cmp(&b.game_id));
        rows
    }

    /// Copies the whole state. Each entity is read under its own lock.
    pub async fn export(&self) -> StoreSnapshot {
        let mut snapshot = StoreSnapshot::default();
        for user in self.users.all().await {
            snapshot.users.push(user.read().await.clone());
        }
        for pet in self.pets.all().await {
            snapshot.pets.push(pet.read().await.clone());
        }
        for set in self.daily_tasks.all().await {
            snapshot.daily_tasks.push(set.read().await.clone());
        }
        snapshot.progress = self.progress.read().await.values().cloned().collect();
        snapshot
    }

    /// Loads a snapshot, replacing entities with the same ids.
    pub async fn restore(&self, snapshot: StoreSnapshot) {
        let mut indexes = self.indexes.write().await;
        for user in snapshot.users {
            indexes.add_user(&user);
            self.users.upsert(user).await;
        }
        for pet in snapshot.pets {
            indexes.add_pet(&pet);
            self.pets.upsert(pet).await;
        }
        for set in snapshot.daily_tasks {
            indexes.tasks_by_day.insert((set.user_id, set.date), set.id);
            self.daily_tasks.upsert(set).await;
        }
        let mut progress = self.progress.write().await;
        for row in snapshot.progress {
            progress.insert((row.user_id, row.game_id.clone()), row);
        }
    }
}
