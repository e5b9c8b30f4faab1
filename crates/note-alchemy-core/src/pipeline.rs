//! The staged synthesis pipeline.
//!
//! A strictly linear 5-stage state machine, one pass per invocation:
//!
//! 1. **Fingerprint** — condense the article into a query fingerprint.
//! 2. **Retrieve** — fetch up to `candidate_k` lexical candidates.
//! 3. **Re-rank** — ask the relevance reasoner for the top `context_k`
//!    ids; fall back to retrieval order when its reply is unusable.
//! 4. **Fetch context** — resolve ranked candidates to full documents,
//!    silently skipping ids that vanished since retrieval.
//! 5. **Synthesize** — produce knowledge points; wrap unstructured output
//!    as a single note.
//!
//! No stage is retried; a fatal failure (store unavailable, fingerprint
//! generation) aborts the whole run and the caller re-runs from stage 1
//! if it wants a retry. Stage outputs are immutable values threaded
//! explicitly from one stage to the next.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{Candidate, Document, KnowledgePoint};
use crate::reason::{
    parse_rerank, parse_synthesis, FingerprintGenerator, NoteSynthesizer, RankedRef,
    RelevanceReasoner, RerankOutput, SynthesisOutput,
};
use crate::store::Store;

/// Title given to a note wrapped from unstructured synthesizer output.
pub const FALLBACK_NOTE_TITLE: &str = "Generated note";

/// Breadth settings for one pipeline run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineParams {
    /// Candidates fetched at the retrieve stage.
    pub candidate_k: usize,
    /// Documents kept after re-ranking and used as synthesis context.
    /// Expected to be at most `candidate_k`.
    pub context_k: usize,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            candidate_k: 25,
            context_k: 5,
        }
    }
}

/// Fatal pipeline failures.
///
/// Degradations at the re-rank and synthesize stages are absorbed by
/// their documented fallbacks and never surface here.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The persistence layer could not be reached or written. Aborts the
    /// run at whichever stage invoked the store.
    #[error("document store unavailable: {0:#}")]
    StoreUnavailable(anyhow::Error),
    /// Fingerprint generation failed. A fingerprint is required to
    /// proceed, so there is no fallback.
    #[error("fingerprint generation failed: {0:#}")]
    Fingerprint(anyhow::Error),
}

/// All stage outputs of a single run, for callers that want the trace.
///
/// Created fresh per invocation, never persisted.
#[derive(Debug)]
pub struct PipelineRun {
    pub query_fingerprint: String,
    pub candidates: Vec<Candidate>,
    pub ranked_candidates: Vec<Candidate>,
    /// The reasoner's justifications, parallel to `ranked_candidates`.
    /// Empty when the re-rank fallback was taken.
    pub justifications: Vec<RankedRef>,
    pub context_notes: Vec<Document>,
    pub knowledge_points: Vec<KnowledgePoint>,
}

/// The pipeline orchestrator: a store plus the three injected reasoning
/// capabilities.
pub struct Pipeline<S: Store> {
    store: S,
    fingerprinter: Arc<dyn FingerprintGenerator>,
    reasoner: Arc<dyn RelevanceReasoner>,
    synthesizer: Arc<dyn NoteSynthesizer>,
    params: PipelineParams,
}

impl<S: Store> Pipeline<S> {
    pub fn new(
        store: S,
        fingerprinter: Arc<dyn FingerprintGenerator>,
        reasoner: Arc<dyn RelevanceReasoner>,
        synthesizer: Arc<dyn NoteSynthesizer>,
        params: PipelineParams,
    ) -> Self {
        Self {
            store,
            fingerprinter,
            reasoner,
            synthesizer,
            params,
        }
    }

    /// Run the pipeline and return the synthesized knowledge points.
    ///
    /// This is the single boundary the orchestrator exposes; transport
    /// (CLI, HTTP) is entirely external.
    pub async fn process(
        &self,
        article_text: &str,
        source_url: &str,
    ) -> Result<Vec<KnowledgePoint>, PipelineError> {
        self.run(article_text, source_url)
            .await
            .map(|run| run.knowledge_points)
    }

    /// Run the pipeline and return every stage's output.
    pub async fn run(
        &self,
        article_text: &str,
        source_url: &str,
    ) -> Result<PipelineRun, PipelineError> {
        let query_fingerprint = self
            .fingerprinter
            .fingerprint(article_text)
            .await
            .map_err(PipelineError::Fingerprint)?;
        debug!(len = query_fingerprint.len(), "distilled query fingerprint");

        let candidates = self
            .store
            .search(&query_fingerprint, self.params.candidate_k)
            .await
            .map_err(PipelineError::StoreUnavailable)?;
        debug!(count = candidates.len(), "retrieved lexical candidates");

        let (ranked_candidates, justifications) =
            self.rerank(&query_fingerprint, &candidates).await;

        let context_notes = self.fetch_context(&ranked_candidates).await?;

        let knowledge_points = self
            .synthesize(article_text, source_url, &context_notes)
            .await;

        Ok(PipelineRun {
            query_fingerprint,
            candidates,
            ranked_candidates,
            justifications,
            context_notes,
            knowledge_points,
        })
    }

    /// Stage 3. Degrades to the first `context_k` candidates in retrieval
    /// order when the reasoner fails or returns an unusable reply.
    async fn rerank(
        &self,
        query_fingerprint: &str,
        candidates: &[Candidate],
    ) -> (Vec<Candidate>, Vec<RankedRef>) {
        let k = self.params.context_k;

        let raw = match self
            .reasoner
            .rerank(query_fingerprint, candidates, k)
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "relevance reasoner failed; keeping retrieval order");
                return (candidates.iter().take(k).cloned().collect(), Vec::new());
            }
        };

        match parse_rerank(&raw) {
            RerankOutput::Ranked(refs) => {
                let mut ranked = Vec::new();
                let mut kept = Vec::new();
                for r in refs {
                    if ranked.len() == k {
                        break;
                    }
                    // Ids outside the candidate set, and repeats, are ignored.
                    if ranked.iter().any(|c: &Candidate| c.doc_id == r.id) {
                        continue;
                    }
                    if let Some(candidate) = candidates.iter().find(|c| c.doc_id == r.id) {
                        debug!(doc_id = %r.id, reason = %r.reason, "reasoner kept candidate");
                        ranked.push(candidate.clone());
                        kept.push(r);
                    }
                }
                (ranked, kept)
            }
            RerankOutput::Unstructured(_) => {
                warn!("relevance reasoner reply was unstructured; keeping retrieval order");
                (candidates.iter().take(k).cloned().collect(), Vec::new())
            }
        }
    }

    /// Stage 4. Ids that no longer resolve (deleted since retrieval) are
    /// skipped, not errors.
    async fn fetch_context(
        &self,
        ranked: &[Candidate],
    ) -> Result<Vec<Document>, PipelineError> {
        let mut notes = Vec::with_capacity(ranked.len());
        for candidate in ranked {
            match self
                .store
                .get(&candidate.doc_id)
                .await
                .map_err(PipelineError::StoreUnavailable)?
            {
                Some(doc) => notes.push(doc),
                None => {
                    debug!(doc_id = %candidate.doc_id, "candidate vanished since retrieval; skipping")
                }
            }
        }
        Ok(notes)
    }

    /// Stage 5. Unstructured output is wrapped as a single note; an
    /// outright synthesizer failure yields an empty note list. Neither
    /// aborts the run.
    async fn synthesize(
        &self,
        article_text: &str,
        source_url: &str,
        context: &[Document],
    ) -> Vec<KnowledgePoint> {
        let raw = match self
            .synthesizer
            .synthesize(article_text, source_url, context)
            .await
        {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "note synthesizer failed; returning no notes");
                return Vec::new();
            }
        };

        match parse_synthesis(&raw) {
            SynthesisOutput::Points(points) => points,
            SynthesisOutput::Unstructured(text) => {
                warn!("synthesizer reply was unstructured; wrapping as a single note");
                vec![KnowledgePoint {
                    title: FALLBACK_NOTE_TITLE.to_string(),
                    content: text,
                }]
            }
        }
    }
}
