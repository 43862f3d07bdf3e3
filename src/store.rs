//! In-memory vector storage and exact top-k search

use crate::error::{EmbeddingDbError, Result};
use crate::similarity::cosine_similarity;
use crate::top_k::{ScoredLabel, TopK};
use crate::vector::Vector;
use std::collections::HashMap;

/// What to search for: a stored label or a raw vector.
#[derive(Debug, Clone, Copy)]
pub enum Query<'a> {
    Label(&'a str),
    Vector(&'a Vector),
}

impl<'a> From<&'a str> for Query<'a> {
    fn from(label: &'a str) -> Self {
        Query::Label(label)
    }
}

impl<'a> From<&'a Vector> for Query<'a> {
    fn from(vector: &'a Vector) -> Self {
        Query::Vector(vector)
    }
}

/// Per-search policy knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// When querying by label, leave that label out of the results.
    /// Has no effect on raw-vector queries.
    pub exclude_self: bool,
}

impl SearchOptions {
    pub fn excluding_self() -> Self {
        Self { exclude_self: true }
    }
}

/// In-memory mapping from label to a fixed-dimension vector.
///
/// The store holds no locks; callers sharing it across threads wrap it in
/// `RwLock` themselves.
#[derive(Debug, Clone)]
pub struct VectorStore {
    dimension: usize,
    entries: HashMap<String, Vector>,
}

impl VectorStore {
    /// Create an empty store whose vectors all have `dimension` components.
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(EmbeddingDbError::InvalidDimension { dim: dimension });
        }
        Ok(Self {
            dimension,
            entries: HashMap::new(),
        })
    }

    /// Insert a vector under `label`, replacing any previous vector for it.
    ///
    /// Every stored vector has a direction: zero vectors fail with
    /// `ZeroVector`, so no entry can make a later search fail. On error the
    /// store is left untouched.
    pub fn insert(&mut self, label: impl Into<String>, vector: Vector) -> Result<()> {
        self.check_scorable(&vector)?;
        self.entries.insert(label.into(), vector);
        Ok(())
    }

    /// Look up the vector stored under `label`
    pub fn get(&self, label: &str) -> Result<&Vector> {
        self.entries
            .get(label)
            .ok_or_else(|| EmbeddingDbError::NotFound {
                label: label.to_string(),
            })
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// All stored labels, in no particular order
    pub fn labels(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Iterate over all (label, vector) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vector)> {
        self.entries.iter().map(|(label, v)| (label.as_str(), v))
    }

    /// Get the number of vectors in the store
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The dimension every stored vector has
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Score every stored vector against `query` and keep the `k` best.
    ///
    /// Results are ordered by similarity descending, ties broken by label
    /// ascending, and hold `min(k, candidates)` entries.
    pub fn search<'q>(
        &self,
        query: impl Into<Query<'q>>,
        k: usize,
        options: SearchOptions,
    ) -> Result<Vec<ScoredLabel>> {
        let query = query.into();
        let (query_vector, self_label) = match query {
            Query::Label(label) => (self.get(label)?, Some(label)),
            Query::Vector(vector) => {
                self.check_scorable(vector)?;
                (vector, None)
            }
        };

        let mut top = TopK::new(k);
        for (label, vector) in self.iter() {
            if options.exclude_self && self_label == Some(label) {
                continue;
            }
            let score = cosine_similarity(query_vector, vector)?;
            top.push(ScoredLabel::new(label, score));
        }

        Ok(top.into_sorted_vec())
    }

    /// Like [`search`](Self::search), keeping only the labels.
    pub fn find_closest<'q>(
        &self,
        query: impl Into<Query<'q>>,
        k: usize,
        options: SearchOptions,
    ) -> Result<Vec<String>> {
        Ok(self
            .search(query, k, options)?
            .into_iter()
            .map(|scored| scored.label)
            .collect())
    }

    /// Right length, finite, and not the zero vector.
    fn check_scorable(&self, vector: &Vector) -> Result<()> {
        if vector.dimension() != self.dimension {
            return Err(EmbeddingDbError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.dimension(),
            });
        }
        vector.ensure_finite()?;
        if vector.is_zero() {
            return Err(EmbeddingDbError::ZeroVector);
        }
        Ok(())
    }
}
