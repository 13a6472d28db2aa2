//! Wayfind Core
//!
//! Core types and logic for the Wayfind tourism-recommendation API:
//!
//! - Catalog entities (places, users, favorites) and validated DTOs
//! - The hybrid retrieval engine (structured pre-filter + embedding-distance
//!   ranking with a calibrated acceptance threshold)
//! - Store and embedder interfaces implemented by the storage and provider
//!   crates
//! - Password hashing and bearer-token issuance
//! - Environment-driven configuration
//!
//! # Example: running a semantic search
//!
//! ```no_run
//! use std::sync::Arc;
//! use wayfind_core::retrieval::RetrievalEngine;
//! use wayfind_core::testing::{InMemoryCatalog, StubEmbedder};
//!
//! # async fn run() -> wayfind_core::Result<()> {
//! let engine = RetrievalEngine::new(
//!     Arc::new(StubEmbedder::new()),
//!     Arc::new(InMemoryCatalog::new()),
//! );
//! let places = engine.semantic_search("cozy coffee shop", Some("Omsk"), 3).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod embedder;
pub mod error;
pub mod retrieval;
pub mod security;
pub mod testing;
pub mod types;

pub use catalog::{CatalogStore, PlaceFilter, ProfileChanges, RankQuery, RankedPlace, UserStore};
pub use config::{load_env, ApiConfig};
pub use embedder::TextEmbedder;
pub use error::{Result, WayfindError};
pub use retrieval::RetrievalEngine;
pub use security::TokenIssuer;
pub use types::{
    FilterSearchRequest, LoginRequest, NewPlace, Place, PlaceCreate, ProfileResponse,
    RegisterRequest, SemanticSearchRequest, TokenResponse, UpdateProfileRequest, User,
    UserResponse, EMBEDDING_DIM,
};
