//! Wayfind SQL storage
//!
//! PostgreSQL adapter backed by the pgvector extension: places catalog with
//! L2 nearest-neighbor ranking, user accounts, and favorite links.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-exports
pub use wayfind_core;

pub mod postgres;

// Re-export adapters
pub use postgres::PostgresAdapter;
