//! Text embedding interface

use crate::Result;
use async_trait::async_trait;

/// Maps arbitrary text to a fixed-length, unit-normalized dense vector.
///
/// Implementations own the model and its worker capacity; callers treat
/// `embed` as the single suspension point of the retrieval pipeline.
/// Failures surface as `Embedding` (model unavailable or erroring) or
/// `Timeout` (computation exceeded its deadline); neither is retried here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Compute the embedding for `text`
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Output dimension of the underlying model
    fn dimension(&self) -> usize;
}
