//! Core data models used throughout Note Alchemy.
//!
//! These types represent the documents, retrieval candidates, and
//! synthesized notes that flow through the indexing and synthesis pipeline.

use serde::{Deserialize, Serialize};

/// A document in the reasoning index.
///
/// `doc_id` is the single primary key (derived by the caller, typically a
/// path relative to the vault root). An upsert is a full replace — there
/// are no partial-field updates, so writers must always supply all four
/// fields. Cross-document links are expressed inside note content via
/// `[[wikilinks]]` and are not tracked by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable, caller-supplied identifier.
    pub doc_id: String,
    /// Opaque key-value mapping serialized as a JSON blob. The store
    /// round-trips it without interpreting its contents.
    pub metadata: String,
    /// Condensed semantic summary of `full_text`; the unit of lexical
    /// comparison for retrieval.
    pub fingerprint_text: String,
    /// Verbatim source content.
    pub full_text: String,
}

/// A document surfaced by lexical retrieval, not yet confirmed relevant.
///
/// Ephemeral: produced by the ranker and consumed within a single
/// pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub doc_id: String,
    pub fingerprint_text: String,
    /// BM25 relevance score against the query fingerprint.
    pub score: f64,
}

/// One atomic output note produced by synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgePoint {
    pub title: String,
    pub content: String,
}
