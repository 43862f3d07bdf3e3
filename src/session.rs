//! Interactive word-similarity session.
//!
//! Seeds a store by embedding a word list, then answers one word per line
//! with its nearest neighbours. Unknown words are embedded and added before
//! the search, so the store grows as the session goes on.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::embedding::Embedder;
use crate::error::Result;
use crate::store::{SearchOptions, VectorStore};
use crate::top_k::ScoredLabel;

/// Words embedded before the first prompt when none are given.
pub const DEFAULT_SEED_WORDS: &[&str] = &[
    "apple",
    "banana",
    "orange",
    "grape",
    "strawberry",
    "pineapple",
];

const PROMPT: &str = "Enter a word (or 'quit' to exit): ";

/// A store plus the embedder that feeds it.
pub struct Session<E: Embedder> {
    store: VectorStore,
    embedder: E,
    k: usize,
    options: SearchOptions,
}

impl<E: Embedder> Session<E> {
    /// The store dimension is taken from the embedder.
    pub fn new(embedder: E, k: usize, options: SearchOptions) -> Result<Self> {
        let store = VectorStore::new(embedder.dimension())?;
        Ok(Self {
            store,
            embedder,
            k,
            options,
        })
    }

    pub fn store(&self) -> &VectorStore {
        &self.store
    }

    /// Embed `word` and store it under its own text.
    pub async fn add(&mut self, word: &str) -> Result<()> {
        let vector = self.embedder.embed(word).await?;
        self.store.insert(word, vector)?;
        info!(word, total = self.store.len(), "stored embedding");
        Ok(())
    }

    /// Embed every seed word. Failures are logged and skipped; the number of
    /// words stored is returned.
    pub async fn seed<S: AsRef<str>>(&mut self, words: &[S]) -> usize {
        let mut stored = 0;
        for word in words {
            let word = normalize(word.as_ref());
            if word.is_empty() {
                continue;
            }
            match self.add(&word).await {
                Ok(()) => stored += 1,
                Err(e) => warn!(word = %word, error = %e, "failed to embed seed word"),
            }
        }
        stored
    }

    /// Nearest neighbours of `word`, embedding it first if it is new.
    pub async fn query(&mut self, word: &str) -> Result<Vec<ScoredLabel>> {
        if !self.store.contains(word) {
            self.add(word).await?;
        }
        self.store.search(word, self.k, self.options)
    }

    /// Read words from `input` until EOF or `quit`/`exit`, writing prompts
    /// and answers to `out`. Per-word errors are reported and the loop
    /// continues.
    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        loop {
            write!(out, "{}", PROMPT)?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            let word = normalize(&line);
            if word == "quit" || word == "exit" {
                break;
            }
            if word.is_empty() {
                continue;
            }

            match self.query(&word).await {
                Ok(results) => {
                    let labels: Vec<&str> = results.iter().map(|r| r.label.as_str()).collect();
                    writeln!(out, "Closest to '{}': [{}]\n", word, labels.join(", "))?;
                }
                Err(e) => {
                    warn!(word = %word, error = %e, "query failed");
                    writeln!(out, "Error: {}\n", e)?;
                }
            }
        }
        Ok(())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}
