//! # Note Alchemy Core
//!
//! Shared logic for Note Alchemy: data models, the BM25 lexical ranker,
//! the store abstraction, the external-capability contracts, and the
//! staged synthesis pipeline.
//!
//! This crate contains no tokio, sqlx, HTTP, or filesystem dependencies.
//! Async boundaries are expressed through `async-trait` only, so any
//! runtime (or a plain test executor) can drive the pipeline.

pub mod models;
pub mod pipeline;
pub mod ranker;
pub mod reason;
pub mod store;
