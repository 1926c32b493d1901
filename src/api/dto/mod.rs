//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names are camelCase on the wire. Coin amounts are rounded to
//! cents and stats to whole numbers; the domain keeps full precision.

pub mod auth_dto;
pub mod common_dto;
pub mod economy_dto;
pub mod minigame_dto;
pub mod pet_dto;
pub mod shop_dto;

pub use auth_dto::*;
pub use common_dto::*;
pub use economy_dto::*;
pub use minigame_dto::*;
pub use pet_dto::*;
pub use shop_dto::*;
