//! Indexer behavior tests over a throwaway vault directory: change
//! detection by content hash, full re-index, and pruning of deleted
//! files.

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use tempfile::TempDir;

use note_alchemy::config::VaultConfig;
use note_alchemy::indexer::index_vault;
use note_alchemy_core::reason::FingerprintGenerator;
use note_alchemy_core::store::memory::InMemoryStore;
use note_alchemy_core::store::Store;

/// Counts invocations so tests can assert which files were actually
/// re-fingerprinted, not just the reported counters.
struct CountingFingerprinter {
    calls: AtomicUsize,
}

impl CountingFingerprinter {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FingerprintGenerator for CountingFingerprinter {
    async fn fingerprint(&self, text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("fp of: {}", text.lines().next().unwrap_or("")))
    }
}

fn test_vault() -> (TempDir, VaultConfig) {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("alpha.md"), "# Alpha\n\ncats and mammals").unwrap();
    fs::write(tmp.path().join("beta.md"), "# Beta\n\nrocks and minerals").unwrap();

    let vault = VaultConfig {
        root: tmp.path().to_path_buf(),
        include_globs: vec!["**/*.md".to_string()],
        exclude_globs: Vec::new(),
    };
    (tmp, vault)
}

#[tokio::test]
async fn unchanged_files_are_skipped_without_refingerprinting() {
    let (_tmp, vault) = test_vault();
    let store = InMemoryStore::new();
    let fp = CountingFingerprinter::new();

    let first = index_vault(&vault, &store, &fp, false, false).await.unwrap();
    assert_eq!(first.scanned, 2);
    assert_eq!(first.indexed, 2);
    assert_eq!(first.skipped, 0);
    assert_eq!(fp.calls(), 2);

    // Nothing on disk changed; the second run must not touch the model.
    let second = index_vault(&vault, &store, &fp, false, false).await.unwrap();
    assert_eq!(second.indexed, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(fp.calls(), 2);
}

#[tokio::test]
async fn changed_file_is_reindexed_alone() {
    let (tmp, vault) = test_vault();
    let store = InMemoryStore::new();
    let fp = CountingFingerprinter::new();

    index_vault(&vault, &store, &fp, false, false).await.unwrap();
    fs::write(tmp.path().join("alpha.md"), "# Alpha v2\n\nrewritten").unwrap();

    let outcome = index_vault(&vault, &store, &fp, false, false).await.unwrap();
    assert_eq!(outcome.indexed, 1);
    assert_eq!(outcome.skipped, 1);
    assert_eq!(fp.calls(), 3);

    let doc = store.get("alpha.md").await.unwrap().unwrap();
    assert!(doc.full_text.contains("rewritten"));
    assert_eq!(doc.fingerprint_text, "fp of: # Alpha v2");
}

#[tokio::test]
async fn full_reindex_ignores_content_hashes() {
    let (_tmp, vault) = test_vault();
    let store = InMemoryStore::new();
    let fp = CountingFingerprinter::new();

    index_vault(&vault, &store, &fp, false, false).await.unwrap();

    let outcome = index_vault(&vault, &store, &fp, true, false).await.unwrap();
    assert_eq!(outcome.indexed, 2);
    assert_eq!(outcome.skipped, 0);
    assert_eq!(fp.calls(), 4);
}

#[tokio::test]
async fn prune_removes_deleted_files_only_when_requested() {
    let (tmp, vault) = test_vault();
    let store = InMemoryStore::new();
    let fp = CountingFingerprinter::new();

    index_vault(&vault, &store, &fp, false, false).await.unwrap();
    fs::remove_file(tmp.path().join("beta.md")).unwrap();

    // Without prune the stale entry survives.
    let without = index_vault(&vault, &store, &fp, false, false).await.unwrap();
    assert_eq!(without.pruned, 0);
    assert!(store.get("beta.md").await.unwrap().is_some());

    let with = index_vault(&vault, &store, &fp, false, true).await.unwrap();
    assert_eq!(with.scanned, 1);
    assert_eq!(with.pruned, 1);
    assert!(store.get("beta.md").await.unwrap().is_none());
    assert!(store.get("alpha.md").await.unwrap().is_some());
}
