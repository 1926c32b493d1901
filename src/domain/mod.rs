//! Domain layer: game model, time-based rules, storage, and events.
//!
//! The pure rules (stat decay, coin accrual, leveling, breeding genetics)
//! take explicit timestamps and rolls so they can be tested without a
//! clock or RNG. [`GameStore`] holds all entities behind per-entity locks,
//! and [`EventBus`] broadcasts every state change.

pub mod accrual;
pub mod breeding;
pub mod catalog;
pub mod clock;
pub mod daily_task;
pub mod event_bus;
pub mod game_event;
pub mod ids;
pub mod inventory;
pub mod leveling;
pub mod minigame;
pub mod pet;
pub mod registry;
pub mod stats;
pub mod store;
pub mod user;

pub use clock::{Clock, ManualClock, SystemClock};
pub use event_bus::EventBus;
pub use game_event::GameEvent;
pub use ids::{DailyTaskId, PetId, UserId};
pub use pet::Pet;
pub use store::GameStore;
pub use user::User;
