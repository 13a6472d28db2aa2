//! Wayfind embedding provider
//!
//! Local sentence-embedding via fastembed (ONNX), dispatched to a small
//! fixed pool of worker threads so concurrent searches are throttled
//! instead of spawning unbounded model invocations.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod local;

pub use local::LocalEmbedder;
