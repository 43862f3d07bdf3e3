//! Bounded top-k selection of scored labels.
//!
//! Ranking is a total order: higher score first, equal scores broken by label
//! ascending. `TopK` keeps the current worst entry on top of a max-heap so that
//! each candidate is compared against it in O(1) and admitted in O(log k).

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A label paired with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f64,
}

impl ScoredLabel {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }

    /// Rank `self` against `other`: `Less` means `self` belongs earlier in
    /// the result list.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.label.cmp(&other.label))
    }
}

// Heap ordering: the worst-ranked entry compares greatest.
#[derive(Debug)]
struct Ranked(ScoredLabel);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.rank_cmp(&other.0)
    }
}

/// Keeps the `k` best-ranked entries pushed into it.
#[derive(Debug)]
pub struct TopK {
    k: usize,
    heap: BinaryHeap<Ranked>,
}

impl TopK {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            // k can be huge when the caller wants "everything"
            heap: BinaryHeap::with_capacity(k.min(1024)),
        }
    }

    /// Offer a candidate. Below capacity it is always kept; at capacity it
    /// replaces the current worst only if it ranks strictly better.
    pub fn push(&mut self, candidate: ScoredLabel) {
        if self.k == 0 {
            return;
        }

        if self.heap.len() < self.k {
            self.heap.push(Ranked(candidate));
            return;
        }

        let candidate = Ranked(candidate);
        if let Some(mut worst) = self.heap.peek_mut() {
            if candidate < *worst {
                *worst = candidate;
            }
        }
    }

    /// The entry that would be evicted next, if the set is full.
    pub fn worst(&self) -> Option<&ScoredLabel> {
        self.heap.peek().map(|r| &r.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drain into a Vec ordered best to worst.
    pub fn into_sorted_vec(self) -> Vec<ScoredLabel> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|r| r.0)
            .collect()
    }
}
