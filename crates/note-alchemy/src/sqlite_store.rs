//! SQLite-backed [`Store`] implementation.
//!
//! Maps each [`Store`] operation to one statement against the
//! `reasoning_index` table. `list_all` orders by `rowid`, which the
//! conflict-update upsert preserves, so the ranking corpus is always in
//! insertion order and search results are deterministic.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use note_alchemy_core::models::Document;
use note_alchemy_core::store::Store;

/// SQLite implementation of the [`Store`] trait.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_document(row: &sqlx::sqlite::SqliteRow) -> Document {
    Document {
        doc_id: row.get("doc_id"),
        metadata: row.get("metadata"),
        fingerprint_text: row.get("fingerprint_text"),
        full_text: row.get("full_text"),
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn upsert(&self, doc: &Document) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reasoning_index (doc_id, metadata, fingerprint_text, full_text)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(doc_id) DO UPDATE SET
                metadata = excluded.metadata,
                fingerprint_text = excluded.fingerprint_text,
                full_text = excluded.full_text
            "#,
        )
        .bind(&doc.doc_id)
        .bind(&doc.metadata)
        .bind(&doc.fingerprint_text)
        .bind(&doc.full_text)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to upsert document '{}'", doc.doc_id))?;

        Ok(())
    }

    async fn delete(&self, doc_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM reasoning_index WHERE doc_id = ?")
            .bind(doc_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to delete document '{}'", doc_id))?;

        Ok(())
    }

    async fn get(&self, doc_id: &str) -> Result<Option<Document>> {
        let row = sqlx::query(
            "SELECT doc_id, metadata, fingerprint_text, full_text FROM reasoning_index WHERE doc_id = ?",
        )
        .bind(doc_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Failed to fetch document '{}'", doc_id))?;

        Ok(row.as_ref().map(row_to_document))
    }

    async fn list_all(&self) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            "SELECT doc_id, metadata, fingerprint_text, full_text FROM reasoning_index ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to scan the reasoning index")?;

        Ok(rows.iter().map(row_to_document).collect())
    }
}
