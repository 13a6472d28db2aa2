//! Places catalog and search

use crate::error::{validation_error, ApiError};
use crate::state::ApiState;
use axum::extract::State;
use axum::Json;
use tracing::{debug, info};
use validator::Validate;
use wayfind_core::catalog::PlaceFilter;
use wayfind_core::types::{
    FilterSearchRequest, NewPlace, Place, PlaceCreate, SemanticSearchRequest,
};

/// Create a place, embedding its search context (or, failing that, its
/// description). The embedding is written once and never recomputed.
pub async fn create_place(
    State(state): State<ApiState>,
    Json(req): Json<PlaceCreate>,
) -> Result<Json<Place>, ApiError> {
    req.validate().map_err(validation_error)?;

    let text_to_embed = req
        .search_context
        .clone()
        .unwrap_or_else(|| req.description.clone());

    let embedding = state.embedder.embed(&text_to_embed).await?;

    let place = state
        .catalog
        .create_place(NewPlace {
            name: req.name,
            city: req.city,
            kind: req.kind,
            price: req.price,
            description: req.description,
            search_context: Some(text_to_embed),
            image_url: req.image_url,
            embedding,
        })
        .await?;

    info!("Created place {} ('{}')", place.id, place.name);
    Ok(Json(place))
}

/// Hybrid search: SQL city pre-filter + embedding-distance ranking
pub async fn search_ai(
    State(state): State<ApiState>,
    Json(req): Json<SemanticSearchRequest>,
) -> Result<Json<Vec<Place>>, ApiError> {
    req.validate().map_err(validation_error)?;

    debug!(
        "Semantic search: '{}' (city: {:?}, limit: {})",
        req.query, req.city, req.limit
    );

    let places = state
        .engine
        .semantic_search(&req.query, req.city.as_deref(), req.limit)
        .await?;

    Ok(Json(places))
}

/// Structured search with exact-match filters only
pub async fn search_filters(
    State(state): State<ApiState>,
    Json(req): Json<FilterSearchRequest>,
) -> Result<Json<Vec<Place>>, ApiError> {
    req.validate().map_err(validation_error)?;

    let places = state
        .engine
        .filter_search(&PlaceFilter {
            city: req.city,
            kind: req.kind,
            price: req.price,
            limit: req.limit,
        })
        .await?;

    Ok(Json(places))
}
