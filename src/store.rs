//! In-memory embedding index and retriever.
//!
//! The index is built once at startup from the chunked corpus and is
//! immutable afterwards, so lookups need no locking and independent
//! questions can search it concurrently. Ranking is brute-force cosine
//! similarity over every entry; corpora here are small enough that a
//! linear scan beats maintaining any index structure.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::embedding::{cosine_similarity, Embedder};
use crate::error::{Error, Result};
use crate::models::Segment;

/// One indexed segment with its embedding vector.
#[derive(Debug, Clone)]
pub struct IndexedEntry {
    pub embedding: Vec<f32>,
    pub segment: Segment,
}

/// Brute-force in-memory vector store.
#[derive(Debug)]
pub struct MemoryVectorStore {
    entries: Vec<IndexedEntry>,
}

impl MemoryVectorStore {
    /// Embed all segments and build the index.
    ///
    /// Segments are embedded in `batch_size` batches and stored in input
    /// order. Any provider failure, count mismatch, or dimensionality
    /// mismatch aborts the build: the store is all-or-nothing, a partial
    /// index is never returned.
    pub async fn build(
        embedder: &dyn Embedder,
        segments: Vec<Segment>,
        batch_size: usize,
    ) -> Result<Self> {
        let batch_size = batch_size.max(1);
        let texts: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();

        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(texts.len());
        for batch in texts.chunks(batch_size) {
            let batch_embeddings = embedder.embed(batch).await?;
            if batch_embeddings.len() != batch.len() {
                return Err(Error::Embedding(format!(
                    "provider returned {} embeddings for {} inputs",
                    batch_embeddings.len(),
                    batch.len()
                )));
            }
            embeddings.extend(batch_embeddings);
        }

        if let Some(first) = embeddings.first() {
            let dims = first.len();
            for (i, embedding) in embeddings.iter().enumerate() {
                if embedding.len() != dims {
                    return Err(Error::Embedding(format!(
                        "embedding dimensionality mismatch: segment {} has {} dims, expected {}",
                        i,
                        embedding.len(),
                        dims
                    )));
                }
            }
        }

        let entries = embeddings
            .into_iter()
            .zip(segments)
            .map(|(embedding, segment)| IndexedEntry { embedding, segment })
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the `k` segments most similar to the query vector.
    ///
    /// Entries are ranked by descending [`cosine_similarity`]. The sort is
    /// stable, so entries with equal scores keep their insertion order.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<Segment> {
        let mut scored: Vec<(f32, &IndexedEntry)> = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(query, &entry.embedding), entry))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.truncate(k);

        scored
            .into_iter()
            .map(|(_, entry)| entry.segment.clone())
            .collect()
    }
}

/// Retriever: embeds a question and returns the most similar segments.
pub struct Retriever {
    store: MemoryVectorStore,
    embedder: Arc<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    pub fn new(store: MemoryVectorStore, embedder: Arc<dyn Embedder>, top_k: usize) -> Self {
        Self {
            store,
            embedder,
            top_k,
        }
    }

    /// Embed the question and return up to `top_k` segments ranked by
    /// descending cosine similarity.
    ///
    /// An empty index yields an empty result without contacting the
    /// embedding provider.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<Segment>> {
        if self.store.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self
            .embedder
            .embed(&[question.to_string()])
            .await
            .map_err(|e| match e {
                Error::Embedding(msg) => Error::Retrieval(msg),
                other => other,
            })?;
        let query = vectors.into_iter().next().ok_or_else(|| {
            Error::Retrieval("provider returned no embedding for the question".to_string())
        })?;

        Ok(self.store.search(&query, self.top_k))
    }
}
