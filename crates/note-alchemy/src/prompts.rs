//! Prompt templates for the three reasoning stages.
//!
//! Each function renders a complete prompt for one capability. The rerank
//! and synthesis prompts pin the JSON reply shapes that
//! `note_alchemy_core::reason` parses; when a model strays from them the
//! pipeline's fallbacks absorb it.

use note_alchemy_core::models::{Candidate, Document};

/// Prompt that condenses a text into a dense reasoning fingerprint.
pub fn distillation_prompt(text: &str) -> String {
    format!(
        r#"You are a knowledge essence distiller. Read the following text and extract its core concepts, logical arguments, and essential insights. Condense them into a dense, machine-readable "reasoning fingerprint".

Fingerprint rules:
- Be extremely terse. Use symbols (=>, <=>, &, |), abbreviations, and technical terms.
- Capture the "what", "why", and "how". Drop filler, examples, and rhetorical flourish.
- Another AI must be able to reconstruct the text's core logic from the fingerprint alone.
- Human readability is not a goal.

Distill the essence of this text:
---
{text}
---
"#
    )
}

/// Prompt that asks the reasoner to rank candidate fingerprints against a
/// query fingerprint.
pub fn rerank_prompt(query_fingerprint: &str, candidates: &[Candidate], top_k: usize) -> String {
    let candidate_fingerprints = candidates
        .iter()
        .map(|c| format!("ID: {}\nFingerprint: {}", c.doc_id, c.fingerprint_text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a knowledge-connection reasoning engine. Determine the logical relevance between a new query and candidate notes from a knowledge base.

New query fingerprint:
{query_fingerprint}

Candidate note fingerprints:
{candidate_fingerprints}

Your task:
1. Analyze the query fingerprint to understand its core concepts.
2. For each candidate, assess its logical connection to the query. A connection can be:
   - prerequisite: a foundational concept the query builds on.
   - application: a practical application of the query's concepts.
   - elaboration: a deep dive into a sub-topic of the query.
   - contrast: an opposing or alternative view.
   - solution: a resolution of a problem the query raises.
3. Return the {top_k} most relevant candidate IDs, most relevant first.
4. You MUST output only a valid JSON object with a single key "results": a list of objects, each with "id" and "reason" keys.

Example JSON output:
{{
  "results": [
    {{
      "id": "notes/concept-a.md",
      "reason": "Defines the foundational concept the query's main argument builds on."
    }},
    {{
      "id": "projects/project-x-review.md",
      "reason": "A direct example of applying the approach the query proposes."
    }}
  ]
}}
"#
    )
}

/// Prompt that asks the synthesizer for atomic, linkable knowledge points.
pub fn synthesis_prompt(source_url: &str, article_text: &str, context: &[Document]) -> String {
    let context_notes = context
        .iter()
        .map(|note| format!("Note ID: {}\nContent:\n{}", note.doc_id, note.full_text))
        .collect::<Vec<_>>()
        .join("\n---\n");

    format!(
        r#"You are an expert knowledge curator for a note vault. Based on a new article and the existing context notes, create new atomic notes.

Generation rules:
- Atomic: each note captures one clear, self-contained idea. If the article has several key points, produce several notes.
- Title: each note's title must work directly as a [[link]] — a concept, not a sentence.
- Linking: use [[wikilinks]] to connect to existing concepts, and state how the note extends, complements, or challenges the context notes.
- Output: you MUST output only a valid JSON object with a single key "knowledge_points": a list of objects, each with "title" and "content" keys. The content of each note is a complete Markdown block.

New article source URL: {source_url}

New article content:
{article_text}

Existing context notes:
{context_notes}

Generate the result from the material above.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rerank_prompt_lists_all_candidates() {
        let candidates = vec![
            Candidate {
                doc_id: "notes/a.md".to_string(),
                fingerprint_text: "a=>b".to_string(),
                score: 1.0,
            },
            Candidate {
                doc_id: "notes/b.md".to_string(),
                fingerprint_text: "c=>d".to_string(),
                score: 0.5,
            },
        ];
        let prompt = rerank_prompt("q=>r", &candidates, 2);
        assert!(prompt.contains("ID: notes/a.md"));
        assert!(prompt.contains("Fingerprint: c=>d"));
        assert!(prompt.contains("q=>r"));
    }

    #[test]
    fn test_synthesis_prompt_embeds_context_and_url() {
        let context = vec![Document {
            doc_id: "notes/x.md".to_string(),
            metadata: "{}".to_string(),
            fingerprint_text: "x".to_string(),
            full_text: "full text of x".to_string(),
        }];
        let prompt = synthesis_prompt("https://example.com/post", "the article", &context);
        assert!(prompt.contains("Note ID: notes/x.md"));
        assert!(prompt.contains("full text of x"));
        assert!(prompt.contains("https://example.com/post"));
    }
}
