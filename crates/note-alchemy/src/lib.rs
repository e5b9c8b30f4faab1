//! # Note Alchemy
//!
//! **A staged retrieval-and-synthesis pipeline that turns new articles
//! into cross-linked atomic notes.**
//!
//! Note Alchemy keeps a SQLite "reasoning index" of vault documents, each
//! condensed into a dense semantic fingerprint, and processes new articles
//! through a fixed 5-stage pipeline: fingerprint → retrieve (BM25) →
//! re-rank (relevance reasoning) → fetch context → synthesize.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌───────────────┐   ┌─────────────────┐
//! │   Vault    │──▶│    Indexer     │──▶│     SQLite      │
//! │  *.md      │   │ scan+distill  │   │ reasoning_index │
//! └────────────┘   └───────────────┘   └────────┬────────┘
//!                                               │
//!            new article ──▶ 5-stage pipeline ◀─┘
//!                                  │
//!                                  ▼
//!                        atomic knowledge points
//! ```
//!
//! ## Data Flow
//!
//! 1. The **indexer** ([`indexer`]) walks the vault, distills each file
//!    into a fingerprint via the chat provider, and upserts
//!    `(doc_id, metadata, fingerprint, full text)` rows.
//! 2. The **pipeline** (`note_alchemy_core::pipeline`) fingerprints a new
//!    article, ranks the fingerprint corpus with BM25, asks the relevance
//!    reasoner for the best few, resolves them to full documents, and
//!    synthesizes new atomic notes that `[[link]]` into the vault.
//! 3. The **CLI** (`alchemist`) exposes indexing, processing, search, and
//!    maintenance commands.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`db`] | SQLite connection pool with WAL mode |
//! | [`migrate`] | Database schema migrations (idempotent) |
//! | [`sqlite_store`] | SQLite implementation of the core `Store` trait |
//! | [`llm`] | Chat provider trait, OpenAI-compatible implementation |
//! | [`prompts`] | Distillation, rerank, and synthesis prompt templates |
//! | [`stages`] | Chat-backed implementations of the capability traits |
//! | [`indexer`] | Vault scan, change detection, fingerprint, prune |
//! | [`process`] | Pipeline entry glue: config → store → providers → run |
//! | [`stats`] | Index statistics |

pub mod config;
pub mod db;
pub mod indexer;
pub mod llm;
pub mod migrate;
pub mod process;
pub mod prompts;
pub mod sqlite_store;
pub mod stages;
pub mod stats;

pub use note_alchemy_core::models::{Candidate, Document, KnowledgePoint};
pub use note_alchemy_core::pipeline::{Pipeline, PipelineError, PipelineParams};
pub use note_alchemy_core::store::Store;
