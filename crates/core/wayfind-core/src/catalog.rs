//! Store interfaces for places, users, and favorites

use crate::types::{NewPlace, Place, User};
use crate::Result;
use async_trait::async_trait;

/// A place paired with its L2 distance to a query embedding
#[derive(Debug, Clone)]
pub struct RankedPlace {
    /// The candidate place
    pub place: Place,
    /// Euclidean distance between the query embedding and the stored one
    pub distance: f32,
}

/// Parameters for a vector ranking query
#[derive(Debug, Clone)]
pub struct RankQuery {
    /// Query embedding to rank against
    pub embedding: Vec<f32>,
    /// Exact-match city pre-filter
    pub city: Option<String>,
    /// Maximum number of candidates examined
    pub limit: i64,
}

/// Profile fields to change; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// Replacement display name
    pub username: Option<String>,
    /// Replacement password hash
    pub password_hash: Option<String>,
}

/// Structured filters for the non-semantic search path
#[derive(Debug, Clone)]
pub struct PlaceFilter {
    /// Exact-match city, required
    pub city: String,
    /// Exact-match category
    pub kind: Option<String>,
    /// Exact-match price tier
    pub price: Option<String>,
    /// Maximum number of results
    pub limit: i64,
}

/// Catalog of places with vector-distance ranking.
///
/// Nearest-neighbor ordering is provided natively by the store (pgvector);
/// no custom index structure lives on this side of the boundary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Persist a new place (embedding included) and return it with its id
    async fn create_place(&self, place: NewPlace) -> Result<Place>;

    /// Fetch a place by id
    async fn get_place(&self, id: i32) -> Result<Option<Place>>;

    /// Rank places by ascending L2 distance to the query embedding,
    /// optionally pre-filtered by exact city match, capped at
    /// `query.limit` candidates.
    async fn rank_by_distance(&self, query: RankQuery) -> Result<Vec<RankedPlace>>;

    /// Structured lookup: exact-match filters, deterministic id order, capped
    async fn filter_places(&self, filter: &PlaceFilter) -> Result<Vec<Place>>;
}

/// Accounts and favorite-place links.
///
/// Favorite links are owned jointly by user and place; referential
/// integrity (cascade on delete) belongs to the store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create an account; fails with a conflict error when the email is taken
    async fn create_user(&self, email: &str, username: &str, password_hash: &str) -> Result<User>;

    /// Look up an account by email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up an account by id
    async fn find_by_id(&self, id: i32) -> Result<Option<User>>;

    /// Update username and/or password hash; returns the updated account
    async fn update_profile(&self, id: i32, changes: ProfileChanges) -> Result<User>;

    /// All places the user has bookmarked, in id order
    async fn favorites_of(&self, user_id: i32) -> Result<Vec<Place>>;

    /// Bookmark a place. Idempotent: re-adding an existing favorite is a
    /// no-op. Fails with not-found when the place does not exist.
    async fn add_favorite(&self, user_id: i32, place_id: i32) -> Result<()>;

    /// Remove a bookmark. Removing a non-favorite is a no-op.
    async fn remove_favorite(&self, user_id: i32, place_id: i32) -> Result<()>;
}
