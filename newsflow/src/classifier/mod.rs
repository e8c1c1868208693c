use anyhow::Result;
use tracing::warn;

pub mod remote;

/// Conventional local address of the classification service.
pub const DEFAULT_PREDICT_URL: &str = "http://127.0.0.1:8001/predict";

/// Label recorded when the classification capability cannot produce one.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";

/// Core trait for classification backends.
///
/// Implementations map article text to a topic label. Empty text is passed
/// through unchanged; deciding what to do with it is the backend's business.
#[async_trait::async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a piece of text, returning the topic label.
    async fn classify(&self, text: &str) -> Result<String>;
}

/// Classify with degradation to the sentinel label.
///
/// Any failure (network, non-success status, timeout) is logged and mapped to
/// `FALLBACK_CATEGORY`; the returned flag says whether the capability produced
/// the label. Exactly one attempt is made per invocation, no retries: ingest
/// latency matters more than classification completeness here.
pub async fn classify_with_fallback<C: Classifier + ?Sized>(
    classifier: &C,
    text: &str,
) -> (String, bool) {
    match classifier.classify(text).await {
        Ok(category) => (category, true),
        Err(e) => {
            warn!(
                "classification failed: {:#}, falling back to '{}'",
                e, FALLBACK_CATEGORY
            );
            (FALLBACK_CATEGORY.to_string(), false)
        }
    }
}
