//! # embedding-db
//!
//! An in-memory embedding store with exact cosine-similarity search.
//!
//! This library provides:
//! - A fixed-dimension vector store keyed by label
//! - Cosine similarity with an explicit zero-vector error
//! - Exact top-k search with deterministic tie-breaking
//! - Embedding providers (OpenAI-compatible HTTP, deterministic mock)
//! - An interactive session and an HTTP API around the store
//!
//! ## Example
//!
//! ```rust
//! use embedding_db::{SearchOptions, Vector, VectorStore};
//!
//! let mut store = VectorStore::new(2).unwrap();
//! store.insert("x", Vector::new(vec![1.0, 0.0])).unwrap();
//! store.insert("y", Vector::new(vec![0.0, 1.0])).unwrap();
//! store.insert("z", Vector::new(vec![1.0, 1.0])).unwrap();
//!
//! let query = Vector::new(vec![1.0, 0.0]);
//! let closest = store.find_closest(&query, 2, SearchOptions::default()).unwrap();
//! assert_eq!(closest, vec!["x", "z"]);
//! ```

pub mod embedding;
pub mod error;
pub mod metrics;
pub mod server;
pub mod session;
pub mod similarity;
pub mod store;
pub mod top_k;
pub mod vector;

pub use embedding::{Embedder, EmbedderConfig, MockEmbedder, OpenAiEmbedder};
pub use error::{EmbeddingDbError, Result};
pub use similarity::cosine_similarity;
pub use store::{Query, SearchOptions, VectorStore};
pub use top_k::{ScoredLabel, TopK};
pub use vector::Vector;
