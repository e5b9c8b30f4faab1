//! Database schema migrations (idempotent).

use anyhow::Result;
use sqlx::SqlitePool;

/// Create the reasoning index table if it does not exist.
///
/// A single table keyed by `doc_id`; the lexical ranker performs
/// full-corpus scans, so no secondary indexes are needed.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reasoning_index (
            doc_id TEXT PRIMARY KEY,
            metadata TEXT NOT NULL DEFAULT '{}',
            fingerprint_text TEXT NOT NULL DEFAULT '',
            full_text TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
