//! Testing utilities: stub embedder and in-memory stores
//!
//! These back the adaptor-level tests without a running PostgreSQL or a
//! downloaded ONNX model. The in-memory stores mirror the SQL adapter's
//! observable behavior (idempotent favorites, id-ordered filter results,
//! ascending-distance ranking).

use crate::catalog::{CatalogStore, PlaceFilter, ProfileChanges, RankQuery, RankedPlace, UserStore};
use crate::embedder::TextEmbedder;
use crate::types::{NewPlace, Place, User};
use crate::{Result, WayfindError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};

/// Euclidean (L2) distance between two vectors
pub fn l2_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Deterministic embedder for tests.
///
/// Returns a unit-normalized vector derived from the input bytes, records
/// every text it is asked to embed, and supports pinning exact vectors per
/// text so tests can control distances.
pub struct StubEmbedder {
    dimension: usize,
    pinned: Mutex<HashMap<String, Vec<f32>>>,
    recorded: Mutex<Vec<String>>,
    fail: bool,
}

impl StubEmbedder {
    /// Create a stub with a small default dimension
    pub fn new() -> Self {
        Self::with_dimension(8)
    }

    /// Create a stub with a specific output dimension
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            dimension,
            pinned: Mutex::new(HashMap::new()),
            recorded: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// Create a stub whose every call fails with an embedding error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Pin the exact vector returned for `text`
    pub fn pin(self, text: &str, vector: Vec<f32>) -> Self {
        self.pinned
            .lock()
            .unwrap()
            .insert(text.to_string(), vector);
        self
    }

    /// Every text passed to `embed`, in call order
    pub fn embedded_texts(&self) -> Vec<String> {
        self.recorded.lock().unwrap().clone()
    }

    fn synthesize(&self, text: &str) -> Vec<f32> {
        // Cheap deterministic spread: seed from the bytes, then normalize
        let mut seed = 0u64;
        for b in text.bytes() {
            seed = seed.wrapping_mul(31).wrapping_add(u64::from(b));
        }
        let mut vector: Vec<f32> = (0..self.dimension)
            .map(|i| {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(i as u64 + 1);
                ((seed >> 33) as f32 / u32::MAX as f32) - 0.5
            })
            .collect();
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextEmbedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.recorded.lock().unwrap().push(text.to_string());
        if self.fail {
            return Err(WayfindError::embedding("stub embedder configured to fail"));
        }
        if let Some(pinned) = self.pinned.lock().unwrap().get(text) {
            return Ok(pinned.clone());
        }
        Ok(self.synthesize(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// In-memory catalog store mirroring the SQL adapter's behavior
pub struct InMemoryCatalog {
    places: Mutex<Vec<Place>>,
    next_id: AtomicI32,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            places: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// Number of places stored
    pub fn len(&self) -> usize {
        self.places.lock().unwrap().len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn create_place(&self, place: NewPlace) -> Result<Place> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Place {
            id,
            name: place.name,
            city: place.city,
            kind: place.kind,
            price: place.price,
            description: place.description,
            search_context: place.search_context,
            image_url: place.image_url,
            embedding: Some(place.embedding),
        };
        self.places.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn get_place(&self, id: i32) -> Result<Option<Place>> {
        Ok(self
            .places
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn rank_by_distance(&self, query: RankQuery) -> Result<Vec<RankedPlace>> {
        let places = self.places.lock().unwrap();
        let mut ranked: Vec<RankedPlace> = places
            .iter()
            .filter(|p| query.city.as_ref().map_or(true, |c| &p.city == c))
            .filter_map(|p| {
                p.embedding.as_ref().map(|e| RankedPlace {
                    place: p.clone(),
                    distance: l2_distance(&query.embedding, e),
                })
            })
            .collect();
        ranked.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.place.id.cmp(&b.place.id))
        });
        ranked.truncate(query.limit.max(0) as usize);
        Ok(ranked)
    }

    async fn filter_places(&self, filter: &PlaceFilter) -> Result<Vec<Place>> {
        let places = self.places.lock().unwrap();
        let mut matched: Vec<Place> = places
            .iter()
            .filter(|p| p.city == filter.city)
            .filter(|p| filter.kind.as_ref().map_or(true, |k| &p.kind == k))
            .filter(|p| {
                filter
                    .price
                    .as_ref()
                    .map_or(true, |pr| p.price.as_ref() == Some(pr))
            })
            .cloned()
            .collect();
        matched.sort_by_key(|p| p.id);
        matched.truncate(filter.limit.max(0) as usize);
        Ok(matched)
    }
}

/// In-memory user/favorites store, coupled to an [`InMemoryCatalog`] for
/// place existence checks and favorite hydration
pub struct InMemoryUsers {
    catalog: Arc<InMemoryCatalog>,
    users: Mutex<Vec<User>>,
    favorites: Mutex<HashSet<(i32, i32)>>,
    next_id: AtomicI32,
}

impl InMemoryUsers {
    /// Create an empty user store sharing `catalog`
    pub fn new(catalog: Arc<InMemoryCatalog>) -> Self {
        Self {
            catalog,
            users: Mutex::new(Vec::new()),
            favorites: Mutex::new(HashSet::new()),
            next_id: AtomicI32::new(1),
        }
    }

    /// Number of favorite links for a user
    pub fn favorite_count(&self, user_id: i32) -> usize {
        self.favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| *u == user_id)
            .count()
    }
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn create_user(&self, email: &str, username: &str, password_hash: &str) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(WayfindError::conflict(format!(
                "Email '{}' already registered",
                email
            )));
        }
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            email: email.to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn update_profile(&self, id: i32, changes: ProfileChanges) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| WayfindError::not_found(format!("User {}", id)))?;
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        Ok(user.clone())
    }

    async fn favorites_of(&self, user_id: i32) -> Result<Vec<Place>> {
        let favorite_ids: Vec<i32> = self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| *u == user_id)
            .map(|(_, p)| *p)
            .collect();
        let places = self.catalog.places.lock().unwrap();
        let mut favorites: Vec<Place> = places
            .iter()
            .filter(|p| favorite_ids.contains(&p.id))
            .cloned()
            .collect();
        favorites.sort_by_key(|p| p.id);
        Ok(favorites)
    }

    async fn add_favorite(&self, user_id: i32, place_id: i32) -> Result<()> {
        if self.catalog.get_place(place_id).await?.is_none() {
            return Err(WayfindError::not_found(format!("Place {}", place_id)));
        }
        self.favorites.lock().unwrap().insert((user_id, place_id));
        Ok(())
    }

    async fn remove_favorite(&self, user_id: i32, place_id: i32) -> Result<()> {
        self.favorites.lock().unwrap().remove(&(user_id, place_id));
        Ok(())
    }
}
