//! PostgreSQL database adapter

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use tracing::{debug, info, warn};
use wayfind_core::catalog::{
    CatalogStore, PlaceFilter, ProfileChanges, RankQuery, RankedPlace, UserStore,
};
use wayfind_core::types::{NewPlace, Place, User, EMBEDDING_DIM};
use wayfind_core::{Result, WayfindError};

/// Render an embedding as a pgvector text literal: `[v1,v2,...]`
fn vector_literal(embedding: &[f32]) -> String {
    format!(
        "[{}]",
        embedding
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    )
}

/// Reject embeddings whose length does not match the model dimension
fn ensure_dimension(embedding: &[f32], expected: usize) -> Result<()> {
    if embedding.len() != expected {
        return Err(WayfindError::validation(format!(
            "Embedding has {} components, expected {}",
            embedding.len(),
            expected
        )));
    }
    Ok(())
}

fn row_to_place(row: &PgRow) -> Place {
    Place {
        id: row.get("id"),
        name: row.get("name"),
        city: row.get("city"),
        kind: row.get("type"),
        price: row.get("price"),
        description: row.get("description"),
        search_context: row.get("search_context"),
        image_url: row.get("image_url"),
        embedding: None,
    }
}

fn row_to_user(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
    }
}

/// PostgreSQL adapter for the catalog, users, and favorites
pub struct PostgresAdapter {
    pool: PgPool,
    embedding_dimension: usize,
}

impl PostgresAdapter {
    /// Connect to PostgreSQL and create an adapter
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Connecting to PostgreSQL database...");

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(WayfindError::DatabaseSqlx)?;

        Ok(Self::with_pool(pool))
    }

    /// Create an adapter over an existing pool
    pub fn with_pool(pool: PgPool) -> Self {
        Self {
            pool,
            embedding_dimension: EMBEDDING_DIM,
        }
    }

    /// Access the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Initialize the schema: pgvector extension, tables, and indexes.
    ///
    /// Idempotent; safe to run on every startup.
    pub async fn initialize(&self) -> Result<()> {
        debug!("Initializing database schema...");

        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id SERIAL PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL,
                password_hash TEXT NOT NULL
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS places (
                id SERIAL PRIMARY KEY,
                name TEXT NOT NULL,
                city TEXT NOT NULL,
                type TEXT NOT NULL,
                price TEXT,
                description TEXT NOT NULL,
                search_context TEXT,
                image_url TEXT,
                embedding vector({}) NOT NULL
            )
        "#,
            self.embedding_dimension
        ))
        .execute(&self.pool)
        .await?;

        // Favorites junction table (user <-> place); the store owns
        // referential integrity, links die with either endpoint row
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS favorites (
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                place_id INTEGER NOT NULL REFERENCES places(id) ON DELETE CASCADE,
                PRIMARY KEY (user_id, place_id)
            )
        "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS places_city_idx ON places (city)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS places_name_idx ON places (name)")
            .execute(&self.pool)
            .await?;

        // HNSW index for fast L2 nearest-neighbor ranking
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS places_embedding_idx
             ON places USING hnsw (embedding vector_l2_ops)",
        )
        .execute(&self.pool)
        .await?;

        info!("Database schema ready");
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for PostgresAdapter {
    async fn create_place(&self, place: NewPlace) -> Result<Place> {
        ensure_dimension(&place.embedding, self.embedding_dimension)?;

        let row = sqlx::query(
            "INSERT INTO places (name, city, type, price, description, search_context, image_url, embedding)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8::vector)
             RETURNING id",
        )
        .bind(&place.name)
        .bind(&place.city)
        .bind(&place.kind)
        .bind(&place.price)
        .bind(&place.description)
        .bind(&place.search_context)
        .bind(&place.image_url)
        .bind(vector_literal(&place.embedding))
        .fetch_one(&self.pool)
        .await?;

        let id: i32 = row.get("id");
        debug!("Created place {} ('{}')", id, place.name);

        Ok(Place {
            id,
            name: place.name,
            city: place.city,
            kind: place.kind,
            price: place.price,
            description: place.description,
            search_context: place.search_context,
            image_url: place.image_url,
            embedding: Some(place.embedding),
        })
    }

    async fn get_place(&self, id: i32) -> Result<Option<Place>> {
        let row = sqlx::query(
            "SELECT id, name, city, type, price, description, search_context, image_url
             FROM places WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_place))
    }

    async fn rank_by_distance(&self, query: RankQuery) -> Result<Vec<RankedPlace>> {
        ensure_dimension(&query.embedding, self.embedding_dimension)?;

        // Build query with the optional city pre-filter
        let mut sql = String::from(
            "SELECT id, name, city, type, price, description, search_context, image_url,
             embedding <-> $1::vector AS distance
             FROM places",
        );

        let mut param_count = 2;
        if query.city.is_some() {
            sql.push_str(&format!(" WHERE city = ${}", param_count));
            param_count += 1;
        }
        sql.push_str(&format!(" ORDER BY distance ASC LIMIT ${}", param_count));

        let mut sql_query = sqlx::query(&sql).bind(vector_literal(&query.embedding));
        if let Some(city) = &query.city {
            sql_query = sql_query.bind(city);
        }
        sql_query = sql_query.bind(query.limit);

        let rows = sql_query.fetch_all(&self.pool).await.map_err(|e| {
            warn!("Vector ranking failed: {}", e);
            WayfindError::database(format!("Vector ranking failed: {}", e))
        })?;

        let ranked = rows
            .iter()
            .map(|row| {
                let distance: f64 = row.get("distance");
                RankedPlace {
                    place: row_to_place(row),
                    distance: distance as f32,
                }
            })
            .collect();

        Ok(ranked)
    }

    async fn filter_places(&self, filter: &PlaceFilter) -> Result<Vec<Place>> {
        let mut query = String::from(
            "SELECT id, name, city, type, price, description, search_context, image_url
             FROM places WHERE city = $1",
        );

        let mut param_count = 2;
        if filter.kind.is_some() {
            query.push_str(&format!(" AND type = ${}", param_count));
            param_count += 1;
        }
        if filter.price.is_some() {
            query.push_str(&format!(" AND price = ${}", param_count));
            param_count += 1;
        }
        // Deterministic tie order so capped results are reproducible
        query.push_str(&format!(" ORDER BY id ASC LIMIT ${}", param_count));

        let mut sql_query = sqlx::query(&query).bind(&filter.city);
        if let Some(kind) = &filter.kind {
            sql_query = sql_query.bind(kind);
        }
        if let Some(price) = &filter.price {
            sql_query = sql_query.bind(price);
        }
        sql_query = sql_query.bind(filter.limit);

        let rows = sql_query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_place).collect())
    }
}

#[async_trait]
impl UserStore for PostgresAdapter {
    async fn create_user(&self, email: &str, username: &str, password_hash: &str) -> Result<User> {
        let row = sqlx::query(
            "INSERT INTO users (email, username, password_hash)
             VALUES ($1, $2, $3)
             RETURNING id, email, username, password_hash",
        )
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                WayfindError::conflict(format!("Email '{}' already registered", email))
            }
            _ => WayfindError::DatabaseSqlx(e),
        })?;

        Ok(row_to_user(&row))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, username, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>> {
        let row =
            sqlx::query("SELECT id, email, username, password_hash FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.as_ref().map(row_to_user))
    }

    async fn update_profile(&self, id: i32, changes: ProfileChanges) -> Result<User> {
        let row = sqlx::query(
            "UPDATE users
             SET username = COALESCE($2, username),
                 password_hash = COALESCE($3, password_hash)
             WHERE id = $1
             RETURNING id, email, username, password_hash",
        )
        .bind(id)
        .bind(&changes.username)
        .bind(&changes.password_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| WayfindError::not_found(format!("User {}", id)))?;

        Ok(row_to_user(&row))
    }

    async fn favorites_of(&self, user_id: i32) -> Result<Vec<Place>> {
        let rows = sqlx::query(
            "SELECT p.id, p.name, p.city, p.type, p.price, p.description,
                    p.search_context, p.image_url
             FROM places p
             JOIN favorites f ON f.place_id = p.id
             WHERE f.user_id = $1
             ORDER BY p.id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_place).collect())
    }

    async fn add_favorite(&self, user_id: i32, place_id: i32) -> Result<()> {
        let exists = sqlx::query("SELECT 1 AS one FROM places WHERE id = $1")
            .bind(place_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(WayfindError::not_found(format!("Place {}", place_id)));
        }

        // Idempotent: a duplicate pair is silently ignored
        sqlx::query(
            "INSERT INTO favorites (user_id, place_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(place_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_favorite(&self, user_id: i32, place_id: i32) -> Result<()> {
        // No-op when the link does not exist
        sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND place_id = $2")
            .bind(user_id)
            .bind(place_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
