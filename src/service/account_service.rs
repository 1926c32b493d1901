//! Account service: registration, login, balance, and streak rewards.

use chrono::{DateTime, Utc};

use crate::auth::{TokenSigner, hash_password, verify_password};
use crate::domain::accrual::{CoinLedger, DailyStreak, LoginStreak};
use crate::domain::catalog::{DEFAULT_PET_TYPE, pet_type};
use crate::domain::inventory::Inventory;
use crate::domain::{GameEvent, Pet, User, UserId};
use crate::error::GameError;

use super::GameContext;

/// Token plus the user it was issued for.
#[derive(Debug, Clone)]
pub struct Session {
    /// Bearer token.
    pub token: String,
    /// The authenticated user.
    pub user: User,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Token and user.
    pub session: Session,
    /// Coins granted by the login streak.
    pub login_bonus: f64,
    /// Coins paid for banked offline time.
    pub offline_earnings: f64,
}

/// Result of a daily reward claim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyReward {
    /// Coins granted.
    pub bonus: f64,
    /// Streak after the claim.
    pub streak: u32,
    /// Balance after the claim.
    pub coins: f64,
}

/// Per-user totals for the profile page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserStats {
    /// Settled balance.
    pub coins: f64,
    /// Pets currently owned.
    pub pets_owned: u32,
    /// Level of the most advanced pet.
    pub highest_pet_level: u32,
    /// Minigame rounds finished.
    pub games_played: u32,
    /// Coins won in minigames.
    pub minigame_coins_earned: f64,
    /// Consecutive login days.
    pub login_streak: u32,
    /// Consecutive daily reward claims.
    pub daily_streak: u32,
    /// Registration time.
    pub member_since: DateTime<Utc>,
}

/// Account orchestration.
#[derive(Debug, Clone)]
pub struct AccountService {
    ctx: GameContext,
    tokens: TokenSigner,
    starting_coins: f64,
}

impl AccountService {
    /// Creates a new `AccountService`.
    #[must_use]
    pub fn new(ctx: GameContext, tokens: TokenSigner, starting_coins: f64) -> Self {
        Self {
            ctx,
            tokens,
            starting_coins,
        }
    }

    /// Registers a user and grants the free starter pet.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] for a bad username, e-mail, or password;
    /// [`GameError::Conflict`] if the e-mail or username is taken.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, GameError> {
        let username = validate_username(username)?;
        let email = normalize_email(email)?;
        if password.chars().count() < 6 {
            return Err(GameError::InvalidInput(
                "password must be at least 6 characters".to_string(),
            ));
        }

        let password_hash = hash_off_thread(password.to_string()).await?;
        let now = self.ctx.now();
        let user_id = UserId::new();
        let starter = pet_type(DEFAULT_PET_TYPE)
            .ok_or_else(|| GameError::Internal("default pet type missing".to_string()))?;
        let pet = Pet::adopt(user_id, format!("{username}'s {}", starter.name), starter, now);

        let user = User {
            id: user_id,
            username,
            email,
            password_hash,
            ledger: CoinLedger::new(self.starting_coins, now),
            login: LoginStreak {
                streak: 1,
                last_login: now.date_naive(),
            },
            daily: DailyStreak::default(),
            inventory: Inventory::default(),
            active_pet: Some(pet.id),
            created_at: now,
        };
        let snapshot = user.clone();
        self.ctx.store.insert_user(user).await?;

        let pet_id = pet.id;
        let kind = pet.pet_type.clone();
        self.ctx.store.insert_pet(pet).await?;
        let _ = self.ctx.event_bus.publish(GameEvent::PetCreated {
            user_id,
            pet_id,
            pet_type: kind,
            timestamp: now,
        });
        self.ctx.publish_coins(&snapshot, now);

        tracing::info!(%user_id, username = %snapshot.username, "user registered");
        let token = self.tokens.issue(user_id, now)?;
        Ok(Session {
            token,
            user: snapshot,
        })
    }

    /// Logs a user in, paying offline earnings and the login bonus.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] for unknown e-mails or wrong passwords.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, GameError> {
        let invalid = || GameError::Unauthorized("invalid email or password".to_string());
        let email = email.trim().to_lowercase();
        let user_id = self
            .ctx
            .store
            .user_id_by_email(&email)
            .await
            .ok_or_else(invalid)?;
        let shared = self.ctx.store.user(user_id).await?;
        let stored = shared.read().await.password_hash.clone();
        let candidate = password.to_string();
        let verified = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored))
            .await
            .map_err(|e| GameError::Internal(format!("password check task: {e}")))?;
        if !verified {
            return Err(invalid());
        }

        let mut user = shared.write().await;
        let now = self.ctx.now();
        self.ctx.settle(&mut user, now);
        let offline_earnings = user.ledger.collect_offline(&self.ctx.coin_policy);
        let login_bonus = user.login.record_login(now.date_naive());
        user.ledger.credit(login_bonus);
        let snapshot = user.clone();
        drop(user);

        self.ctx.publish_coins(&snapshot, now);
        tracing::info!(
            %user_id,
            login_bonus,
            offline_earnings,
            streak = snapshot.login.streak,
            "user logged in"
        );
        let token = self.tokens.issue(user_id, now)?;
        Ok(LoginOutcome {
            session: Session {
                token,
                user: snapshot,
            },
            login_bonus,
            offline_earnings,
        })
    }

    /// Resolves a bearer token to an existing user.
    ///
    /// # Errors
    ///
    /// [`GameError::Unauthorized`] for bad tokens or deleted users.
    pub async fn authenticate(&self, token: &str) -> Result<UserId, GameError> {
        let user_id = self.tokens.verify(token, self.ctx.now())?;
        self.ctx
            .store
            .user(user_id)
            .await
            .map_err(|_| GameError::Unauthorized("user no longer exists".to_string()))?;
        Ok(user_id)
    }

    /// The current user with accrual brought up to date.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if the user does not exist.
    pub async fn me(&self, user_id: UserId) -> Result<User, GameError> {
        let (snapshot, added) = self.settled(user_id).await?;
        if added > 0.0 {
            self.ctx.publish_coins(&snapshot, self.ctx.now());
        }
        Ok(snapshot)
    }

    /// Settles online accrual and returns the balance.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if the user does not exist.
    pub async fn balance(&self, user_id: UserId) -> Result<f64, GameError> {
        Ok(self.me(user_id).await?.ledger.coins)
    }

    /// Settles online accrual and returns the balance without publishing
    /// a `CoinsUpdated` event. For callers that reply with the balance
    /// themselves.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if the user does not exist.
    pub async fn balance_for_reply(&self, user_id: UserId) -> Result<f64, GameError> {
        Ok(self.settled(user_id).await?.0.ledger.coins)
    }

    async fn settled(&self, user_id: UserId) -> Result<(User, f64), GameError> {
        let shared = self.ctx.store.user(user_id).await?;
        let mut user = shared.write().await;
        let added = self.ctx.settle(&mut user, self.ctx.now());
        Ok((user.clone(), added))
    }

    /// Changes the caller's username and/or e-mail.
    ///
    /// Uniqueness is re-checked against every other account; the lookup
    /// indexes move with the new values.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidInput`] for an empty update or bad values,
    /// [`GameError::Conflict`] if another account holds either value.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<User, GameError> {
        if username.is_none() && email.is_none() {
            return Err(GameError::InvalidInput(
                "provide a username or an email to update".to_string(),
            ));
        }
        let username = username.map(validate_username).transpose()?;
        let email = email.map(normalize_email).transpose()?;

        let shared = self.ctx.store.user(user_id).await?;
        let mut user = shared.write().await;
        let username = username.unwrap_or_else(|| user.username.clone());
        let email = email.unwrap_or_else(|| user.email.clone());
        self.ctx
            .store
            .reindex_user(
                user_id,
                (user.username.as_str(), user.email.as_str()),
                (username.as_str(), email.as_str()),
            )
            .await?;
        user.username = username;
        user.email = email;
        self.ctx.settle(&mut user, self.ctx.now());
        let snapshot = user.clone();
        drop(user);

        tracing::info!(%user_id, username = %snapshot.username, "profile updated");
        Ok(snapshot)
    }

    /// Aggregated statistics over the caller's pets and minigames.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if the user does not exist.
    pub async fn stats(&self, user_id: UserId) -> Result<UserStats, GameError> {
        let user = self.me(user_id).await?;
        let mut stats = UserStats {
            coins: user.ledger.coins,
            login_streak: user.login.streak,
            daily_streak: user.daily.streak,
            member_since: user.created_at,
            ..UserStats::default()
        };
        for pet_id in self.ctx.store.pet_ids_of(user_id).await {
            let Ok(shared) = self.ctx.store.owned_pet(user_id, pet_id).await else {
                continue;
            };
            let pet = shared.read().await;
            stats.pets_owned += 1;
            stats.highest_pet_level = stats.highest_pet_level.max(pet.progression.level);
        }
        for row in self.ctx.store.progress_of(user_id).await {
            stats.games_played = stats.games_played.saturating_add(row.times_played);
            stats.minigame_coins_earned += row.total_coins_earned;
        }
        Ok(stats)
    }

    /// Pays banked offline time. Returns `(earned, balance)`.
    ///
    /// # Errors
    ///
    /// [`GameError::NotFound`] if the user does not exist.
    pub async fn collect_offline(&self, user_id: UserId) -> Result<(f64, f64), GameError> {
        let shared = self.ctx.store.user(user_id).await?;
        let mut user = shared.write().await;
        let now = self.ctx.now();
        self.ctx.settle(&mut user, now);
        let earned = user.ledger.collect_offline(&self.ctx.coin_policy);
        let snapshot = user.clone();
        drop(user);

        self.ctx.publish_coins(&snapshot, now);
        tracing::debug!(%user_id, earned, "offline earnings collected");
        Ok((earned, snapshot.ledger.coins))
    }

    /// Claims today's daily reward.
    ///
    /// # Errors
    ///
    /// [`GameError::Conflict`] if already claimed today.
    pub async fn claim_daily_streak(&self, user_id: UserId) -> Result<DailyReward, GameError> {
        let shared = self.ctx.store.user(user_id).await?;
        let mut user = shared.write().await;
        let now = self.ctx.now();
        let bonus = user.daily.claim(now.date_naive())?;
        self.ctx.settle(&mut user, now);
        user.ledger.credit(bonus);
        let snapshot = user.clone();
        drop(user);

        self.ctx.publish_coins(&snapshot, now);
        Ok(DailyReward {
            bonus,
            streak: snapshot.daily.streak,
            coins: snapshot.ledger.coins,
        })
    }
}

async fn hash_off_thread(password: String) -> Result<String, GameError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| GameError::Internal(format!("password hashing task: {e}")))?
}

fn validate_username(raw: &str) -> Result<String, GameError> {
    let name = raw.trim();
    let len = name.chars().count();
    if !(3..=30).contains(&len) {
        return Err(GameError::InvalidInput(
            "username must be 3 to 30 characters".to_string(),
        ));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(GameError::InvalidInput(
            "username may only contain letters, digits, '_' and '-'".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn normalize_email(raw: &str) -> Result<String, GameError> {
    let email = raw.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(GameError::InvalidInput(format!("invalid email: {raw}")));
    }
    Ok(email)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::service::test_support::{context, signer};

    fn service() -> (AccountService, std::sync::Arc<crate::domain::ManualClock>) {
        let (ctx, clock) = context();
        (AccountService::new(ctx, signer(), 100.0), clock)
    }

    #[tokio::test]
    async fn fresh_user_has_starting_coins_and_a_pet() {
        let (svc, _) = service();
        let Ok(session) = svc.register("alice", "Alice@Example.com", "secret1").await else {
            panic!("register failed");
        };
        assert_eq!(session.user.ledger.coins, 100.0);
        assert_eq!(session.user.email, "alice@example.com");
        let pets = svc.ctx.store.pet_ids_of(session.user.id).await;
        assert_eq!(pets.len(), 1);
        assert_eq!(session.user.active_pet, pets.first().copied());
        assert_eq!(svc.authenticate(&session.token).await.ok(), Some(session.user.id));
    }

    #[tokio::test]
    async fn registration_validates_and_rejects_duplicates() {
        let (svc, _) = service();
        assert!(svc.register("al", "a@example.com", "secret1").await.is_err());
        assert!(svc.register("alice", "not-an-email", "secret1").await.is_err());
        assert!(svc.register("alice", "a@example.com", "123").await.is_err());
        assert!(svc.register("alice", "a@example.com", "secret1").await.is_ok());
        let Err(GameError::Conflict(_)) = svc.register("bob", "A@example.com", "secret1").await
        else {
            panic!("expected duplicate email conflict");
        };
    }

    #[tokio::test]
    async fn login_checks_password() {
        let (svc, _) = service();
        let _ = svc.register("alice", "a@example.com", "secret1").await;
        let Err(GameError::Unauthorized(_)) = svc.login("a@example.com", "wrong").await else {
            panic!("expected unauthorized");
        };
        let Err(GameError::Unauthorized(_)) = svc.login("x@example.com", "secret1").await else {
            panic!("expected unauthorized");
        };
        assert!(svc.login("A@example.com", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn online_accrual_then_offline_collection_at_login() {
        let (svc, clock) = service();
        let Ok(session) = svc.register("alice", "a@example.com", "secret1").await else {
            panic!("register failed");
        };
        let id = session.user.id;

        clock.advance(Duration::seconds(60));
        assert_eq!(svc.balance(id).await.ok(), Some(160.0));

        clock.advance(Duration::hours(2));
        let Ok(outcome) = svc.login("a@example.com", "secret1").await else {
            panic!("login failed");
        };
        assert_eq!(outcome.offline_earnings, 3600.0);
        assert_eq!(outcome.login_bonus, 0.0);
        assert_eq!(outcome.session.user.ledger.coins, 3760.0);
    }

    #[tokio::test]
    async fn next_day_login_pays_streak_bonus() {
        let (svc, clock) = service();
        let _ = svc.register("alice", "a@example.com", "secret1").await;
        clock.advance(Duration::days(1));
        let Ok(outcome) = svc.login("a@example.com", "secret1").await else {
            panic!("login failed");
        };
        assert_eq!(outcome.login_bonus, 20.0);
        assert_eq!(outcome.session.user.login.streak, 2);
    }

    #[tokio::test]
    async fn daily_streak_is_claimed_once_per_day() {
        let (svc, clock) = service();
        let Ok(session) = svc.register("alice", "a@example.com", "secret1").await else {
            panic!("register failed");
        };
        let id = session.user.id;
        let Ok(first) = svc.claim_daily_streak(id).await else {
            panic!("claim failed");
        };
        assert_eq!(first.bonus, 100.0);
        assert_eq!(first.coins, 200.0);
        let Err(GameError::Conflict(_)) = svc.claim_daily_streak(id).await else {
            panic!("expected conflict");
        };
        clock.advance(Duration::days(1));
        let Ok(second) = svc.claim_daily_streak(id).await else {
            panic!("claim failed");
        };
        assert_eq!(second.bonus, 200.0);
        assert_eq!(second.streak, 2);
    }

    #[tokio::test]
    async fn balance_changes_are_published() {
        let (svc, clock) = service();
        let Ok(session) = svc.register("alice", "a@example.com", "secret1").await else {
            panic!("register failed");
        };
        let mut rx = svc.ctx.event_bus.subscribe();
        clock.advance(Duration::seconds(5));
        let _ = svc.balance(session.user.id).await;
        let Ok(GameEvent::CoinsUpdated { coins, .. }) = rx.recv().await else {
            panic!("expected coins event");
        };
        assert_eq!(coins, 105.0);
    }

    #[tokio::test]
    async fn reply_balance_settles_without_publishing() {
        let (svc, clock) = service();
        let Ok(session) = svc.register("alice", "a@example.com", "secret1").await else {
            panic!("register failed");
        };
        let mut rx = svc.ctx.event_bus.subscribe();
        clock.advance(Duration::seconds(30));
        assert_eq!(svc.balance_for_reply(session.user.id).await.ok(), Some(130.0));
        assert!(rx.try_recv().is_err());
        assert_eq!(svc.balance(session.user.id).await.ok(), Some(130.0));
    }

    #[tokio::test]
    async fn profile_update_moves_login_and_keeps_uniqueness() {
        let (svc, _) = service();
        let Ok(alice) = svc.register("alice", "a@example.com", "secret1").await else {
            panic!("register failed");
        };
        let _ = svc.register("bob", "b@example.com", "secret1").await;
        let id = alice.user.id;

        let Err(GameError::InvalidInput(_)) = svc.update_profile(id, None, None).await else {
            panic!("expected empty update rejection");
        };
        let Err(GameError::Conflict(_)) = svc.update_profile(id, Some("BOB"), None).await else {
            panic!("expected username conflict");
        };
        let Err(GameError::Conflict(_)) = svc.update_profile(id, None, Some("b@example.com")).await
        else {
            panic!("expected email conflict");
        };

        let Ok(user) = svc
            .update_profile(id, Some("alicia"), Some("Alicia@Example.com"))
            .await
        else {
            panic!("update failed");
        };
        assert_eq!(user.username, "alicia");
        assert_eq!(user.email, "alicia@example.com");
        assert!(svc.login("a@example.com", "secret1").await.is_err());
        assert!(svc.login("alicia@example.com", "secret1").await.is_ok());
        assert!(svc.register("alice", "a@example.com", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn stats_cover_pets_and_streaks() {
        let (svc, _) = service();
        let Ok(session) = svc.register("alice", "a@example.com", "secret1").await else {
            panic!("register failed");
        };
        let Ok(stats) = svc.stats(session.user.id).await else {
            panic!("stats failed");
        };
        assert_eq!(stats.pets_owned, 1);
        assert_eq!(stats.highest_pet_level, 1);
        assert_eq!(stats.games_played, 0);
        assert_eq!(stats.coins, 100.0);
        assert_eq!(stats.login_streak, 1);
        assert_eq!(stats.member_since, session.user.created_at);
    }
}
