//! Hybrid retrieval engine: structured pre-filter + embedding-distance ranking

use crate::catalog::{CatalogStore, PlaceFilter, RankQuery, RankedPlace};
use crate::config::DEFAULT_SEARCH_THRESHOLD;
use crate::embedder::TextEmbedder;
use crate::types::Place;
use crate::Result;
use std::sync::Arc;
use tracing::debug;

/// Converts a free-text query into a ranked, thresholded candidate set.
///
/// The pipeline is strictly sequential: the query embedding completes
/// before the store ranking query is issued, and no other resource is held
/// across the embedding await. The acceptance threshold is injected at
/// construction so it can be recalibrated per embedding model.
pub struct RetrievalEngine {
    embedder: Arc<dyn TextEmbedder>,
    catalog: Arc<dyn CatalogStore>,
    distance_threshold: f32,
}

impl RetrievalEngine {
    /// Create an engine with the default acceptance threshold
    pub fn new(embedder: Arc<dyn TextEmbedder>, catalog: Arc<dyn CatalogStore>) -> Self {
        Self::with_threshold(embedder, catalog, DEFAULT_SEARCH_THRESHOLD)
    }

    /// Create an engine with a custom acceptance threshold
    pub fn with_threshold(
        embedder: Arc<dyn TextEmbedder>,
        catalog: Arc<dyn CatalogStore>,
        distance_threshold: f32,
    ) -> Self {
        Self {
            embedder,
            catalog,
            distance_threshold,
        }
    }

    /// The configured L2-distance acceptance threshold
    pub fn distance_threshold(&self) -> f32 {
        self.distance_threshold
    }

    /// Semantic search: embed the query, rank candidates by L2 distance
    /// with an optional exact-match city pre-filter, then keep only
    /// candidates strictly below the acceptance threshold.
    ///
    /// `limit` bounds the candidates examined, not the final output; the
    /// threshold cutoff may shrink the result further. An empty result is
    /// not an error. Embedder failures abort the call before the store is
    /// touched, so ranking never runs against a stale or zero vector.
    pub async fn semantic_search(
        &self,
        query: &str,
        city: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Place>> {
        let query_embedding = self.embedder.embed(query).await?;

        let candidates = self
            .catalog
            .rank_by_distance(RankQuery {
                embedding: query_embedding,
                city: city.map(str::to_string),
                limit,
            })
            .await?;

        debug!(
            "Semantic search '{}': {} candidate(s), threshold {}",
            query,
            candidates.len(),
            self.distance_threshold
        );

        let mut accepted = Vec::with_capacity(candidates.len());
        for RankedPlace { place, distance } in candidates {
            if distance < self.distance_threshold {
                debug!("Candidate '{}' accepted (distance {})", place.name, distance);
                accepted.push(place);
            } else {
                debug!("Candidate '{}' skipped (distance {})", place.name, distance);
            }
        }

        Ok(accepted)
    }

    /// Structured lookup with no embedding involved: exact-match filters,
    /// deterministic id order, capped at the requested limit.
    pub async fn filter_search(&self, filter: &PlaceFilter) -> Result<Vec<Place>> {
        self.catalog.filter_places(filter).await
    }
}
