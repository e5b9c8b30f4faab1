//! Pipeline entry glue shared by the CLI and any embedding caller.
//!
//! Wires config → pool → store → provider → pipeline for one run. The
//! pipeline itself is request-scoped and stateless across runs; only the
//! connection pool is shared.

use std::sync::Arc;

use anyhow::{bail, Result};

use note_alchemy_core::models::KnowledgePoint;
use note_alchemy_core::pipeline::{Pipeline, PipelineParams, PipelineRun};

use crate::config::Config;
use crate::db;
use crate::llm;
use crate::migrate;
use crate::sqlite_store::SqliteStore;
use crate::stages::ChatStages;

/// Run the full 5-stage pipeline on one article.
pub async fn process_article(
    config: &Config,
    article_text: &str,
    source_url: &str,
) -> Result<Vec<KnowledgePoint>> {
    Ok(run_pipeline(config, article_text, source_url)
        .await?
        .knowledge_points)
}

/// Run the pipeline and return the full stage trace (fingerprint,
/// candidates, rerank justifications, context, notes).
pub async fn run_pipeline(
    config: &Config,
    article_text: &str,
    source_url: &str,
) -> Result<PipelineRun> {
    if !config.model.is_enabled() {
        bail!("Processing requires a model provider. Set [model] provider in config.");
    }

    let pool = db::connect(&config.db.path).await?;
    migrate::run_migrations(&pool).await?;
    let store = SqliteStore::new(pool);

    let provider = llm::create_provider(&config.model)?;
    let stages = Arc::new(ChatStages::new(provider));

    let pipeline = Pipeline::new(
        store,
        stages.clone(),
        stages.clone(),
        stages,
        PipelineParams {
            candidate_k: config.retrieval.candidate_k,
            context_k: config.retrieval.context_k,
        },
    );

    Ok(pipeline.run(article_text, source_url).await?)
}
