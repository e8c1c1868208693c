use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::pipeline::ClassifiedRecord;

/// Ensure the required schema exists. This runs CREATE TABLE IF NOT EXISTS statements for the
/// articles table. This function is idempotent and safe to call at startup; it never performs
/// destructive migrations.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<()> {
    info!("storage: ensuring DB schema (CREATE TABLE IF NOT EXISTS ...)");

    let stmts = [
        r#"
        CREATE TABLE IF NOT EXISTS news_articles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            category TEXT NOT NULL,
            source TEXT NOT NULL,
            published_at TIMESTAMP NOT NULL,
            ingested_at TIMESTAMP NOT NULL
        );
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_news_articles_title ON news_articles (title);
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_news_articles_category ON news_articles (category);
        "#,
    ];

    for s in &stmts {
        sqlx::query(s)
            .execute(pool)
            .await
            .with_context(|| "failed to ensure schema")?;
    }

    info!("storage: DB schema ensured");
    Ok(())
}

/// Store one classified record, returning the store-assigned id.
///
/// The insert runs inside its own transaction scoped to this single write.
/// On success the transaction commits; on any failure it rolls back when the
/// `Transaction` is dropped, so the connection returns to the pool on every
/// exit path. `ingested_at` is assigned here, at persistence time.
pub async fn save_article(pool: &SqlitePool, record: &ClassifiedRecord) -> Result<i64> {
    let mut tx = pool
        .begin()
        .await
        .context("failed to begin insert transaction")?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO news_articles (title, content, category, source, published_at, ingested_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&record.title)
    .bind(&record.content)
    .bind(&record.category)
    .bind(&record.source)
    .bind(record.published_at)
    .bind(Utc::now())
    .fetch_one(&mut tx)
    .await
    .context("failed to insert article")?;

    tx.commit().await.context("failed to commit article insert")?;

    Ok(id)
}
