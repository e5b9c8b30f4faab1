//! BM25 lexical ranking over fingerprint strings.
//!
//! Pure functions over `(doc_id, fingerprint_text)` pairs with no
//! dependency on the store schema. Tokenization is whitespace-delimited
//! and verbatim — no stemming, no stop words — because fingerprints are
//! dense symbolic summaries rather than natural prose.
//!
//! Ordering is deterministic: candidates are sorted by descending score
//! with a stable tie-break on corpus order, and a query with zero tokens
//! scores every document 0.0 and yields the first `top_k` documents in
//! corpus order.

use std::collections::HashMap;

use crate::models::Candidate;

/// BM25 tuning constants.
///
/// The exact values affect ranking quality, not correctness.
#[derive(Debug, Clone, Copy)]
pub struct Bm25Params {
    /// Term-frequency saturation.
    pub k1: f64,
    /// Document-length normalization strength.
    pub b: f64,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self { k1: 1.5, b: 0.75 }
    }
}

/// Split text into verbatim whitespace-delimited tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Rank a corpus of `(doc_id, fingerprint_text)` pairs against a query.
///
/// Returns at most `top_k` candidates ordered by descending BM25 score,
/// ties broken by corpus order. Documents with empty fingerprints score
/// zero against any query but are never excluded from the scan.
pub fn rank(
    query: &str,
    corpus: &[(&str, &str)],
    params: Bm25Params,
    top_k: usize,
) -> Vec<Candidate> {
    if corpus.is_empty() {
        return Vec::new();
    }

    let query_terms = tokenize(query);
    if query_terms.is_empty() {
        // Zero query tokens: well-defined all-zero scores, corpus order.
        return corpus
            .iter()
            .take(top_k)
            .map(|(id, fp)| Candidate {
                doc_id: (*id).to_string(),
                fingerprint_text: (*fp).to_string(),
                score: 0.0,
            })
            .collect();
    }

    let n = corpus.len() as f64;
    let term_freqs: Vec<HashMap<&str, usize>> = corpus
        .iter()
        .map(|(_, fp)| {
            let mut tf = HashMap::new();
            for token in tokenize(fp) {
                *tf.entry(token).or_insert(0) += 1;
            }
            tf
        })
        .collect();
    let doc_lens: Vec<f64> = term_freqs
        .iter()
        .map(|tf| tf.values().sum::<usize>() as f64)
        .collect();
    let avg_len = doc_lens.iter().sum::<f64>() / n;

    // Distinct query terms; duplicated terms contribute once.
    let mut distinct_terms: Vec<&str> = query_terms;
    distinct_terms.sort_unstable();
    distinct_terms.dedup();

    let idf: HashMap<&str, f64> = distinct_terms
        .iter()
        .map(|term| {
            let df = term_freqs.iter().filter(|tf| tf.contains_key(term)).count() as f64;
            // Non-negative IDF variant, safe for df == 0 and df == n.
            (*term, (1.0 + (n - df + 0.5) / (df + 0.5)).ln())
        })
        .collect();

    let mut candidates: Vec<Candidate> = corpus
        .iter()
        .enumerate()
        .map(|(i, (id, fp))| {
            let len_norm = if avg_len > 0.0 {
                1.0 - params.b + params.b * doc_lens[i] / avg_len
            } else {
                1.0
            };
            let score: f64 = distinct_terms
                .iter()
                .map(|term| {
                    let tf = *term_freqs[i].get(term).unwrap_or(&0) as f64;
                    if tf == 0.0 {
                        return 0.0;
                    }
                    idf[term] * tf * (params.k1 + 1.0) / (tf + params.k1 * len_norm)
                })
                .sum();
            Candidate {
                doc_id: (*id).to_string(),
                fingerprint_text: (*fp).to_string(),
                score,
            }
        })
        .collect();

    // Stable sort keeps corpus order for equal scores.
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(top_k);
    candidates
}
