//! Vault indexer: scan, fingerprint, upsert, prune.
//!
//! Walks the configured vault directory, derives each file's `doc_id`
//! from its path relative to the vault root, and keeps the reasoning
//! index in step with the files on disk. Fingerprinting is the expensive
//! step, so files whose content hash is unchanged since the last run are
//! skipped unless `--full` is given.
//!
//! Per-file failures (unreadable file, fingerprint error) are logged and
//! skipped; they never abort the scan.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use walkdir::WalkDir;

use note_alchemy_core::models::Document;
use note_alchemy_core::reason::FingerprintGenerator;
use note_alchemy_core::store::Store;

use crate::config::VaultConfig;

/// Counters from one index run.
#[derive(Debug, Default)]
pub struct IndexOutcome {
    pub scanned: usize,
    pub indexed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub pruned: usize,
}

/// Scan the vault and bring the index up to date.
///
/// `full` re-fingerprints every file regardless of content hash.
/// `prune` deletes index entries whose source file disappeared.
pub async fn index_vault<S: Store>(
    vault: &VaultConfig,
    store: &S,
    fingerprinter: &dyn FingerprintGenerator,
    full: bool,
    prune: bool,
) -> Result<IndexOutcome> {
    let files = scan_vault(vault)?;
    let mut outcome = IndexOutcome {
        scanned: files.len(),
        ..Default::default()
    };

    for (doc_id, path) in &files {
        match index_file(store, fingerprinter, doc_id, path, full).await {
            Ok(true) => outcome.indexed += 1,
            Ok(false) => outcome.skipped += 1,
            Err(err) => {
                warn!(doc_id = %doc_id, error = %err, "failed to index file; skipping");
                outcome.failed += 1;
            }
        }
    }

    if prune {
        let live: HashSet<&str> = files.iter().map(|(id, _)| id.as_str()).collect();
        for doc in store.list_all().await? {
            if !live.contains(doc.doc_id.as_str()) {
                store.delete(&doc.doc_id).await?;
                info!(doc_id = %doc.doc_id, "pruned vanished file from index");
                outcome.pruned += 1;
            }
        }
    }

    Ok(outcome)
}

/// Index one file. Returns `Ok(false)` when the content hash matched the
/// stored document and no fingerprint was generated.
async fn index_file<S: Store>(
    store: &S,
    fingerprinter: &dyn FingerprintGenerator,
    doc_id: &str,
    path: &Path,
    full: bool,
) -> Result<bool> {
    let content = std::fs::read_to_string(path)?;
    let content_hash = hex_sha256(&content);

    if !full {
        if let Some(existing) = store.get(doc_id).await? {
            if stored_content_hash(&existing.metadata).as_deref() == Some(content_hash.as_str()) {
                return Ok(false);
            }
        }
    }

    let metadata = file_metadata_json(path, doc_id, &content_hash)?;
    let fingerprint_text = fingerprinter.fingerprint(&content).await?;

    store
        .upsert(&Document {
            doc_id: doc_id.to_string(),
            metadata,
            fingerprint_text,
            full_text: content,
        })
        .await?;

    info!(doc_id = %doc_id, "indexed file");
    Ok(true)
}

/// Walk the vault and return `(doc_id, path)` pairs for matching files,
/// sorted by `doc_id` for deterministic ordering.
pub fn scan_vault(vault: &VaultConfig) -> Result<Vec<(String, PathBuf)>> {
    if !vault.root.exists() {
        anyhow::bail!("Vault root does not exist: {}", vault.root.display());
    }

    let include_set = build_globset(&vault.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/.obsidian/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(vault.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut files = Vec::new();

    for entry in WalkDir::new(&vault.root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(&vault.root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        files.push((rel_str, path.to_path_buf()));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(files)
}

/// Serialize file metadata as the opaque JSON blob stored alongside the
/// fingerprint. The store round-trips it; only the indexer reads
/// `content_hash` back for change detection.
fn file_metadata_json(path: &Path, relative_path: &str, content_hash: &str) -> Result<String> {
    let meta = std::fs::metadata(path)?;
    let modified_secs = meta
        .modified()
        .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        .duration_since(std::time::SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(serde_json::to_string(&json!({
        "file_name": file_name,
        "file_path": relative_path,
        "modified_time": modified_secs,
        "file_size": meta.len(),
        "content_hash": content_hash,
        "indexed_at": chrono::Utc::now().to_rfc3339(),
    }))?)
}

fn stored_content_hash(metadata: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(metadata).ok()?;
    value
        .get("content_hash")
        .and_then(|h| h.as_str())
        .map(|h| h.to_string())
}

fn hex_sha256(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
