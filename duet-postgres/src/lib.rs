//! Diesel/Postgres adapters for the duet matching engine's store traits.
//!
//! The decision upsert and the `ON CONFLICT DO NOTHING` match insert carry
//! the concurrency guarantees; see `duet-engine::store` for the contracts.

pub mod models;
pub mod schema;
pub mod store;

pub use store::{DbPool, PgStore};
