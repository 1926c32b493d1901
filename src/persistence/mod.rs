//! Persistence layer: PostgreSQL entity snapshots and event log.
//!
//! The game runs entirely in memory. When enabled, a background task
//! upserts a JSONB image of every entity on an interval and another
//! appends each bus event to an event log; on startup the latest images
//! are loaded back into the store.

pub mod models;
pub mod postgres;
pub mod worker;
