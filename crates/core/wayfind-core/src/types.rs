//! Core entities and request/response types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Output dimension of the sentence-embedding model
pub const EMBEDDING_DIM: usize = 768;

/// A point of interest in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    /// Store-assigned identifier
    pub id: i32,

    /// Display name
    pub name: String,

    /// City the place belongs to (exact-match filterable)
    pub city: String,

    /// Category, e.g. "Cafe", "Park", "Museum"
    #[serde(rename = "type")]
    pub kind: String,

    /// Price tier, e.g. "$", "$$"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    /// Free-text description shown to users
    pub description: String,

    /// Extended text used preferentially for embedding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_context: Option<String>,

    /// Image reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Embedding vector; populated on creation, never serialized to clients
    #[serde(skip)]
    pub embedding: Option<Vec<f32>>,
}

impl Place {
    /// The text this place's embedding is derived from:
    /// `search_context` when present, else `description`.
    pub fn embeddable_text(&self) -> &str {
        self.search_context.as_deref().unwrap_or(&self.description)
    }
}

/// A registered account
#[derive(Debug, Clone)]
pub struct User {
    /// Store-assigned identifier
    pub id: i32,
    /// Unique email
    pub email: String,
    /// Display name
    pub username: String,
    /// Argon2 password hash, never plaintext
    pub password_hash: String,
}

/// Payload for creating a place (embedding already computed)
#[derive(Debug, Clone)]
pub struct NewPlace {
    /// Display name
    pub name: String,
    /// City
    pub city: String,
    /// Category
    pub kind: String,
    /// Price tier
    pub price: Option<String>,
    /// Description
    pub description: String,
    /// The text the embedding was derived from
    pub search_context: Option<String>,
    /// Image reference
    pub image_url: Option<String>,
    /// Unit-normalized embedding, exactly [`EMBEDDING_DIM`] components
    pub embedding: Vec<f32>,
}

// ---------------------------------------------------------------------------
// Request bodies (validated at the boundary before reaching the core)
// ---------------------------------------------------------------------------

/// Registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Account email, unique
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    /// Plaintext password, hashed before storage
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// Account email
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    /// Plaintext password
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// Profile update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(min = 1, max = 64, message = "username must be 1-64 characters"))]
    pub username: Option<String>,
    /// Current password, required when changing the password
    pub old_password: Option<String>,
    /// Replacement password
    #[validate(length(min = 8, message = "new password must be at least 8 characters"))]
    pub new_password: Option<String>,
}

impl UpdateProfileRequest {
    /// A password change requires the current password for verification.
    pub fn wants_password_change(&self) -> bool {
        self.new_password.is_some()
    }
}

/// Place creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PlaceCreate {
    /// Display name
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    /// City
    #[validate(length(min = 1, message = "city must not be empty"))]
    pub city: String,
    /// Category
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type must not be empty"))]
    pub kind: String,
    /// Price tier
    pub price: Option<String>,
    /// Description
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    /// Extended text to embed instead of the description
    pub search_context: Option<String>,
    /// Image reference
    pub image_url: Option<String>,
}

fn default_semantic_limit() -> i64 {
    1
}

fn default_filter_limit() -> i64 {
    2
}

/// Semantic search request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SemanticSearchRequest {
    /// Free-text query
    #[validate(length(min = 1, message = "query must not be empty"))]
    pub query: String,
    /// Exact-match city pre-filter
    pub city: Option<String>,
    /// Maximum number of candidates examined
    #[serde(default = "default_semantic_limit")]
    #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
    pub limit: i64,
}

/// Filtered (non-semantic) search request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FilterSearchRequest {
    /// Exact-match city, required
    #[validate(length(min = 1, message = "city must not be empty"))]
    pub city: String,
    /// Exact-match category
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Exact-match price tier
    pub price: Option<String>,
    /// Maximum number of results
    #[serde(default = "default_filter_limit")]
    #[validate(range(min = 1, max = 50, message = "limit must be between 1 and 50"))]
    pub limit: i64,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// Issued bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Signed token
    pub access_token: String,
    /// Always "bearer"
    pub token_type: String,
}

impl TokenResponse {
    /// Wrap a signed token in the standard bearer envelope
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Account summary without favorites
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    /// User id
    pub id: i32,
    /// Account email
    pub email: String,
    /// Display name
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }
}

/// Authenticated user profile with favorites
#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    /// User id
    pub id: i32,
    /// Account email
    pub email: String,
    /// Display name
    pub username: String,
    /// Bookmarked places
    pub favorites: Vec<Place>,
}
