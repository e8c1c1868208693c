use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::classifier::{classify_with_fallback, Classifier};
use crate::storage;

/// Source label recorded when the submitter does not name one.
pub const DEFAULT_SOURCE: &str = "Manual Input";

/// An article accepted for ingestion. Constructed once at the endpoint
/// boundary (with defaults filled in) and consumed by exactly one
/// background unit.
#[derive(Debug, Clone)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
}

/// The persisted shape of an article: all Article fields plus the category
/// the classifier produced (or the sentinel). The store assigns the id and
/// `ingested_at` on insert.
#[derive(Debug, Clone)]
pub struct ClassifiedRecord {
    pub title: String,
    pub content: String,
    pub category: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
}

impl ClassifiedRecord {
    fn from_article(article: Article, category: String) -> Self {
        Self {
            title: article.title,
            content: article.content,
            category,
            source: article.source,
            published_at: article.published_at,
        }
    }
}

/// Schedule one background unit for this article and return immediately.
///
/// Fire-and-forget contract: the caller gets acknowledgment of scheduling,
/// not of completion. Completion is observable only via the store or logs.
/// The returned handle is dropped by the HTTP endpoint; tests use it to wait
/// for the unit deterministically.
pub fn submit(
    pool: SqlitePool,
    classifier: Arc<dyn Classifier>,
    article: Article,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        process_article(&pool, classifier.as_ref(), article).await;
    })
}

/// One background unit: classify, then persist, strictly in that order.
///
/// Each step's failure is tolerated independently. Classification failure
/// degrades to the sentinel category and the unit still persists; a failed
/// persist is logged and the record dropped (no retry, no dead-letter).
/// Nothing escapes this function.
async fn process_article(pool: &SqlitePool, classifier: &dyn Classifier, article: Article) {
    let (category, classified) = classify_with_fallback(classifier, &article.content).await;
    if classified {
        info!("classified article '{}' as [{}]", article.title, category);
    }

    let record = ClassifiedRecord::from_article(article, category);

    match storage::save_article(pool, &record).await {
        Ok(id) => info!("saved article {} as [{}]", id, record.category),
        Err(e) => error!(
            "failed to persist article '{}', dropping record: {:#}",
            record.title, e
        ),
    }
}
