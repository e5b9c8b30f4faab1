//! External reasoning capabilities and their structured-output contracts.
//!
//! The three model-backed stages of the pipeline are injected as trait
//! objects, each a single "text in, text out" capability. Concrete
//! implementations (chat-completion providers with prompt templates) live
//! in the application crate; tests use deterministic stubs.
//!
//! Replies from the rerank and synthesis stages are expected to be JSON,
//! but the model may return anything. Parsing therefore never fails:
//! [`parse_rerank`] and [`parse_synthesis`] return sum types whose
//! `Unstructured` variant carries the raw text, and the pipeline's
//! fallback logic operates on that variant explicitly.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{Candidate, Document, KnowledgePoint};

/// Condenses arbitrary text into a dense reasoning fingerprint.
#[async_trait]
pub trait FingerprintGenerator: Send + Sync {
    async fn fingerprint(&self, text: &str) -> Result<String>;
}

/// Judges the logical relevance of candidate fingerprints to a query
/// fingerprint.
///
/// Returns the model's raw textual verdict; the pipeline parses it with
/// [`parse_rerank`] and falls back to retrieval order when it is
/// unusable.
#[async_trait]
pub trait RelevanceReasoner: Send + Sync {
    async fn rerank(
        &self,
        query_fingerprint: &str,
        candidates: &[Candidate],
        top_k: usize,
    ) -> Result<String>;
}

/// Produces atomic notes from a new article plus full-text context
/// documents.
///
/// Returns the model's raw textual output; the pipeline parses it with
/// [`parse_synthesis`] and wraps unstructured text as a single note.
#[async_trait]
pub trait NoteSynthesizer: Send + Sync {
    async fn synthesize(
        &self,
        article_text: &str,
        source_url: &str,
        context: &[Document],
    ) -> Result<String>;
}

/// A ranked candidate reference with the reasoner's justification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RankedRef {
    pub id: String,
    #[serde(default)]
    pub reason: String,
}

/// Outcome of parsing a relevance reasoner reply.
#[derive(Debug, Clone, PartialEq)]
pub enum RerankOutput {
    /// The expected `{"results": [{"id", "reason"}]}` shape.
    Ranked(Vec<RankedRef>),
    /// Anything else, carried verbatim.
    Unstructured(String),
}

/// Outcome of parsing a synthesizer reply.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthesisOutput {
    /// The expected `{"knowledge_points": [{"title", "content"}]}` shape.
    Points(Vec<KnowledgePoint>),
    /// Anything else, carried verbatim.
    Unstructured(String),
}

/// Parse a rerank reply. Malformed JSON or a missing `results` field
/// yields `Unstructured`, never an error.
pub fn parse_rerank(raw: &str) -> RerankOutput {
    #[derive(Deserialize)]
    struct Reply {
        results: Vec<RankedRef>,
    }

    match serde_json::from_str::<Reply>(strip_code_fences(raw)) {
        Ok(reply) => RerankOutput::Ranked(reply.results),
        Err(_) => RerankOutput::Unstructured(raw.to_string()),
    }
}

/// Parse a synthesis reply. Malformed JSON or a missing
/// `knowledge_points` field yields `Unstructured`, never an error.
pub fn parse_synthesis(raw: &str) -> SynthesisOutput {
    #[derive(Deserialize)]
    struct Reply {
        knowledge_points: Vec<KnowledgePoint>,
    }

    match serde_json::from_str::<Reply>(strip_code_fences(raw)) {
        Ok(reply) => SynthesisOutput::Points(reply.knowledge_points),
        Err(_) => SynthesisOutput::Unstructured(raw.to_string()),
    }
}

/// Strip a surrounding Markdown code fence (```json ... ```), which chat
/// models routinely wrap JSON replies in.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") up to the first newline.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rerank_well_formed() {
        let raw = r#"{"results": [{"id": "notes/a.md", "reason": "prerequisite"}, {"id": "notes/b.md", "reason": "application"}]}"#;
        match parse_rerank(raw) {
            RerankOutput::Ranked(refs) => {
                assert_eq!(refs.len(), 2);
                assert_eq!(refs[0].id, "notes/a.md");
                assert_eq!(refs[1].reason, "application");
            }
            other => panic!("expected Ranked, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rerank_missing_reason_defaults_empty() {
        let raw = r#"{"results": [{"id": "notes/a.md"}]}"#;
        match parse_rerank(raw) {
            RerankOutput::Ranked(refs) => assert_eq!(refs[0].reason, ""),
            other => panic!("expected Ranked, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rerank_garbage_is_unstructured() {
        let raw = "I think the most relevant note is a.md";
        assert_eq!(parse_rerank(raw), RerankOutput::Unstructured(raw.to_string()));
    }

    #[test]
    fn test_parse_rerank_missing_results_field_is_unstructured() {
        let raw = r#"{"ranking": ["a", "b"]}"#;
        assert!(matches!(parse_rerank(raw), RerankOutput::Unstructured(_)));
    }

    #[test]
    fn test_parse_synthesis_well_formed() {
        let raw = r#"{"knowledge_points": [{"title": "BM25", "content": "tf-idf ranking"}]}"#;
        match parse_synthesis(raw) {
            SynthesisOutput::Points(points) => {
                assert_eq!(points.len(), 1);
                assert_eq!(points[0].title, "BM25");
            }
            other => panic!("expected Points, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_synthesis_fenced_json() {
        let raw = "```json\n{\"knowledge_points\": [{\"title\": \"T\", \"content\": \"C\"}]}\n```";
        assert!(matches!(parse_synthesis(raw), SynthesisOutput::Points(p) if p.len() == 1));
    }

    #[test]
    fn test_parse_synthesis_plain_text_is_unstructured() {
        let raw = "hello";
        assert_eq!(
            parse_synthesis(raw),
            SynthesisOutput::Unstructured("hello".to_string())
        );
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("plain"), "plain");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  {\"a\":1}  "), "{\"a\":1}");
    }
}
