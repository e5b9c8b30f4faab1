//! Storage abstraction for the reasoning index.
//!
//! The [`Store`] trait defines the persistence operations the pipeline
//! needs, enabling pluggable backends (SQLite, in-memory). Lexical search
//! is a provided method: it scans the full corpus via
//! [`list_all`](Store::list_all) and delegates scoring to the
//! [`ranker`](crate::ranker), so backends never reimplement ranking.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.
//! Each operation is atomic with respect to other operations on the same
//! `doc_id`; there is no cross-call transaction spanning multiple ids, and
//! concurrent upserts of the same id resolve last-writer-wins.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Candidate, Document};
use crate::ranker::{self, Bm25Params};

/// Abstract storage backend for the reasoning index.
///
/// I/O failures propagate to the caller unchanged; no retry is performed
/// inside the store. Retry policy belongs to the caller.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert or replace a document in full. Idempotent.
    async fn upsert(&self, doc: &Document) -> Result<()>;

    /// Remove a document. A no-op (not an error) when the id is absent.
    async fn delete(&self, doc_id: &str) -> Result<()>;

    /// Point lookup by id.
    async fn get(&self, doc_id: &str) -> Result<Option<Document>>;

    /// Full scan in insertion order; the corpus source for ranking.
    async fn list_all(&self) -> Result<Vec<Document>>;

    /// Rank the fingerprint corpus against `query`, returning at most
    /// `top_k` candidates by descending relevance.
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<Candidate>> {
        let docs = self.list_all().await?;
        let corpus: Vec<(&str, &str)> = docs
            .iter()
            .map(|d| (d.doc_id.as_str(), d.fingerprint_text.as_str()))
            .collect();
        Ok(ranker::rank(query, &corpus, Bm25Params::default(), top_k))
    }
}
