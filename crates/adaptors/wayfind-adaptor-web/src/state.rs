//! Shared request-handler state

use std::sync::Arc;
use wayfind_core::catalog::{CatalogStore, UserStore};
use wayfind_core::embedder::TextEmbedder;
use wayfind_core::retrieval::RetrievalEngine;
use wayfind_core::security::TokenIssuer;

/// Everything a handler needs, cloned cheaply per request.
///
/// The stores and the embedder are process-wide singletons constructed in
/// `main` and injected here; requests share them but carry no other
/// mutable in-process state.
#[derive(Clone)]
pub struct ApiState {
    /// Places catalog
    pub catalog: Arc<dyn CatalogStore>,
    /// Accounts and favorites
    pub users: Arc<dyn UserStore>,
    /// Sentence embedder (bounded worker pool)
    pub embedder: Arc<dyn TextEmbedder>,
    /// Hybrid retrieval engine
    pub engine: Arc<RetrievalEngine>,
    /// Bearer-token issuer
    pub tokens: TokenIssuer,
}

impl ApiState {
    /// Wire up the state, building the retrieval engine over the given
    /// stores with the configured acceptance threshold
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        users: Arc<dyn UserStore>,
        embedder: Arc<dyn TextEmbedder>,
        tokens: TokenIssuer,
        search_threshold: f32,
    ) -> Self {
        let engine = Arc::new(RetrievalEngine::with_threshold(
            embedder.clone(),
            catalog.clone(),
            search_threshold,
        ));
        Self {
            catalog,
            users,
            embedder,
            engine,
            tokens,
        }
    }
}
