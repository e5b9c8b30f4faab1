//! In-memory [`Store`] implementation for tests and ephemeral use.
//!
//! Documents live in a `Vec` behind `std::sync::RwLock`, preserving
//! insertion order so that ranking tie-breaks and empty-query results are
//! deterministic. An upsert of an existing id replaces the document in
//! place, keeping its original position.

use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::Document;

use super::Store;

/// In-memory store backed by an insertion-ordered `Vec`.
#[derive(Default)]
pub struct InMemoryStore {
    docs: RwLock<Vec<Document>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn upsert(&self, doc: &Document) -> Result<()> {
        let mut docs = self.docs.write().unwrap();
        match docs.iter_mut().find(|d| d.doc_id == doc.doc_id) {
            Some(existing) => *existing = doc.clone(),
            None => docs.push(doc.clone()),
        }
        Ok(())
    }

    async fn delete(&self, doc_id: &str) -> Result<()> {
        let mut docs = self.docs.write().unwrap();
        docs.retain(|d| d.doc_id != doc_id);
        Ok(())
    }

    async fn get(&self, doc_id: &str) -> Result<Option<Document>> {
        let docs = self.docs.read().unwrap();
        Ok(docs.iter().find(|d| d.doc_id == doc_id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Document>> {
        let docs = self.docs.read().unwrap();
        Ok(docs.clone())
    }
}
