//! Local embedding computation on a bounded worker pool

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, info};
use wayfind_core::embedder::TextEmbedder;
use wayfind_core::{Result, WayfindError};

/// One embedding request traveling to a worker thread
struct EmbedJob {
    text: String,
    reply: oneshot::Sender<Result<Vec<f32>>>,
}

type EmbedFn = Box<dyn FnMut(&str) -> Result<Vec<f32>> + Send>;

/// Map a configured model name onto a fastembed model
fn parse_embedding_model(name: &str) -> EmbeddingModel {
    match name.to_lowercase().as_str() {
        "paraphrase-multilingual-mpnet-base-v2" | "paraphrase-ml-mpnet" => {
            EmbeddingModel::ParaphraseMLMpnetBaseV2
        }
        "multilingual-e5-small" => EmbeddingModel::MultilingualE5Small,
        "multilingual-e5-large" => EmbeddingModel::MultilingualE5Large,
        "all-minilm-l6-v2" | "allminilml6v2" => EmbeddingModel::AllMiniLML6V2,
        _ => EmbeddingModel::ParaphraseMLMpnetBaseV2,
    }
}

/// Output dimension of a fastembed model
fn model_dimension(model: &EmbeddingModel) -> usize {
    match model {
        EmbeddingModel::MultilingualE5Small => 384,
        EmbeddingModel::MultilingualE5Large => 1024,
        EmbeddingModel::AllMiniLML6V2 => 384,
        _ => 768,
    }
}

/// Scale a vector to unit length
fn normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut vector {
            *v /= norm;
        }
    }
    vector
}

/// Sentence embedder backed by a fixed pool of worker threads.
///
/// Each worker owns its own ONNX model instance and pulls jobs from a
/// shared queue; pool capacity is the concurrency ceiling for embedding
/// computations. Replies travel over oneshot channels and are awaited
/// under a timeout so a stuck computation cannot starve callers.
///
/// Build one per process and inject it as `Arc<dyn TextEmbedder>`;
/// dropping the handle closes the queue and the workers drain and exit.
pub struct LocalEmbedder {
    sender: mpsc::Sender<EmbedJob>,
    dimension: usize,
    timeout: Duration,
}

impl LocalEmbedder {
    /// Load `workers` instances of the named model and start the pool.
    ///
    /// Model initialization is eager and sequential; a download/load
    /// failure surfaces here rather than on the first search.
    pub fn new(model_name: &str, workers: usize, timeout: Duration) -> Result<Self> {
        let model = parse_embedding_model(model_name);
        let dimension = model_dimension(&model);
        let worker_count = workers.max(1);

        info!(
            "Loading embedding model '{}' ({} worker(s), {} dimensions)",
            model_name, worker_count, dimension
        );

        let mut embed_fns: Vec<EmbedFn> = Vec::with_capacity(worker_count);
        for _ in 0..worker_count {
            #[allow(unused_mut)]
            let mut text_embedding = TextEmbedding::try_new(
                InitOptions::new(model.clone()).with_show_download_progress(true),
            )
            .map_err(|e| {
                WayfindError::embedding(format!("Failed to initialize embedding model: {}", e))
            })?;

            embed_fns.push(Box::new(move |text: &str| {
                let mut embeddings = text_embedding
                    .embed(vec![text], None)
                    .map_err(|e| WayfindError::embedding(format!("Embedding failed: {}", e)))?;
                embeddings
                    .pop()
                    .ok_or_else(|| WayfindError::embedding("Model returned no embedding"))
            }));
        }

        Ok(Self::spawn_pool(embed_fns, dimension, timeout))
    }

    /// Start worker threads around the given embedding functions
    fn spawn_pool(embed_fns: Vec<EmbedFn>, dimension: usize, timeout: Duration) -> Self {
        let (sender, receiver) = mpsc::channel::<EmbedJob>();
        let receiver = Arc::new(Mutex::new(receiver));

        for (worker_id, mut embed_fn) in embed_fns.into_iter().enumerate() {
            let receiver = Arc::clone(&receiver);
            std::thread::spawn(move || {
                debug!("Embedding worker {} started", worker_id);
                loop {
                    // Guard is dropped at end of statement; only the wait
                    // for the next job is serialized, not the computation
                    let job = match receiver.lock() {
                        Ok(rx) => rx.recv(),
                        Err(_) => break,
                    };
                    let job = match job {
                        Ok(job) => job,
                        Err(_) => break,
                    };
                    let result = embed_fn(&job.text).map(normalize);
                    let _ = job.reply.send(result);
                }
                debug!("Embedding worker {} stopped", worker_id);
            });
        }

        Self {
            sender,
            dimension,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl TextEmbedder for LocalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(EmbedJob {
                text: text.to_string(),
                reply: reply_tx,
            })
            .map_err(|_| WayfindError::embedding("Embedding workers are not running"))?;

        match tokio::time::timeout(self.timeout, reply_rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(WayfindError::embedding(
                "Embedding worker dropped the request",
            )),
            Err(_) => Err(WayfindError::timeout(format!(
                "Embedding timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_pool(workers: usize, timeout: Duration) -> LocalEmbedder {
        let embed_fns: Vec<EmbedFn> = (0..workers)
            .map(|_| Box::new(|text: &str| Ok(vec![text.len() as f32, 3.0, 4.0])) as EmbedFn)
            .collect();
        LocalEmbedder::spawn_pool(embed_fns, 3, timeout)
    }

    #[test]
    fn test_parse_embedding_model() {
        assert!(matches!(
            parse_embedding_model("paraphrase-multilingual-mpnet-base-v2"),
            EmbeddingModel::ParaphraseMLMpnetBaseV2
        ));
        assert!(matches!(
            parse_embedding_model("multilingual-e5-small"),
            EmbeddingModel::MultilingualE5Small
        ));
        // Unknown names fall back to the default multilingual model
        assert!(matches!(
            parse_embedding_model("something-else"),
            EmbeddingModel::ParaphraseMLMpnetBaseV2
        ));
    }

    #[test]
    fn test_model_dimension() {
        assert_eq!(
            model_dimension(&EmbeddingModel::ParaphraseMLMpnetBaseV2),
            768
        );
        assert_eq!(model_dimension(&EmbeddingModel::AllMiniLML6V2), 384);
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = normalize(vec![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        // Zero vectors stay untouched instead of dividing by zero
        assert_eq!(normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[tokio::test]
    async fn test_pool_embeds_and_normalizes() {
        let embedder = stub_pool(2, Duration::from_secs(5));
        let result = embedder.embed("ab").await.unwrap();
        // Stub produced [2, 3, 4]; pool normalizes to unit length
        let norm = result.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert_eq!(embedder.dimension(), 3);
    }

    #[tokio::test]
    async fn test_pool_serves_concurrent_requests() {
        let embedder = Arc::new(stub_pool(2, Duration::from_secs(5)));
        let mut handles = Vec::new();
        for i in 0..8 {
            let embedder = Arc::clone(&embedder);
            handles.push(tokio::spawn(async move {
                embedder.embed(&"x".repeat(i + 1)).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
    }

    #[tokio::test]
    async fn test_slow_worker_times_out() {
        let embed_fns: Vec<EmbedFn> = vec![Box::new(|_text: &str| {
            std::thread::sleep(Duration::from_millis(500));
            Ok(vec![1.0])
        })];
        let embedder = LocalEmbedder::spawn_pool(embed_fns, 1, Duration::from_millis(50));

        let err = embedder.embed("anything").await.unwrap_err();
        assert!(matches!(err, WayfindError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_worker_failure_surfaces_as_embedding_error() {
        let embed_fns: Vec<EmbedFn> = vec![Box::new(|_text: &str| {
            Err(WayfindError::embedding("model exploded"))
        })];
        let embedder = LocalEmbedder::spawn_pool(embed_fns, 1, Duration::from_secs(5));

        let err = embedder.embed("anything").await.unwrap_err();
        assert!(matches!(err, WayfindError::Embedding(_)));
    }
}
