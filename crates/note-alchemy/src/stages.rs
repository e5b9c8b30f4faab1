//! Adapters binding a [`ChatProvider`] to the pipeline's capability traits.
//!
//! One struct implements all three stage contracts; each stage is the
//! same chat completion with a different prompt template. The pipeline
//! only ever sees the trait objects, so tests swap in deterministic
//! stubs without touching any HTTP code.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use note_alchemy_core::models::{Candidate, Document};
use note_alchemy_core::reason::{FingerprintGenerator, NoteSynthesizer, RelevanceReasoner};

use crate::llm::ChatProvider;
use crate::prompts;

/// The three reasoning stages backed by a single chat provider.
pub struct ChatStages {
    provider: Arc<dyn ChatProvider>,
}

impl ChatStages {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl FingerprintGenerator for ChatStages {
    async fn fingerprint(&self, text: &str) -> Result<String> {
        self.provider
            .complete(&prompts::distillation_prompt(text))
            .await
    }
}

#[async_trait]
impl RelevanceReasoner for ChatStages {
    async fn rerank(
        &self,
        query_fingerprint: &str,
        candidates: &[Candidate],
        top_k: usize,
    ) -> Result<String> {
        self.provider
            .complete(&prompts::rerank_prompt(query_fingerprint, candidates, top_k))
            .await
    }
}

#[async_trait]
impl NoteSynthesizer for ChatStages {
    async fn synthesize(
        &self,
        article_text: &str,
        source_url: &str,
        context: &[Document],
    ) -> Result<String> {
        self.provider
            .complete(&prompts::synthesis_prompt(source_url, article_text, context))
            .await
    }
}
