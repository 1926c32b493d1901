//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The endpoint at `/ws?token=…` pushes the authenticated user's balance
//! changes, and on request their pet and minigame events.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
