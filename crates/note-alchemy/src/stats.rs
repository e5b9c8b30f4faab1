//! Reasoning index statistics.

use anyhow::Result;
use sqlx::SqlitePool;

/// Counts reported by `alchemist stats`.
#[derive(Debug)]
pub struct IndexStats {
    pub documents: i64,
    pub fingerprinted: i64,
}

pub async fn collect_stats(pool: &SqlitePool) -> Result<IndexStats> {
    let documents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reasoning_index")
        .fetch_one(pool)
        .await?;

    let fingerprinted: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM reasoning_index WHERE fingerprint_text != ''")
            .fetch_one(pool)
            .await?;

    Ok(IndexStats {
        documents,
        fingerprinted,
    })
}
