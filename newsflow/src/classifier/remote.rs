use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Classifier;

/// Remote classifier using the classification service's HTTP API.
///
/// One outbound POST per `classify` call, bounded by a fixed timeout. The
/// service contract is `POST {url}` with `{"text": ...}`, answering
/// `{"category": ...}` on success.
pub struct RemoteClassifier {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl RemoteClassifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout = Duration::from_secs(timeout_secs);
        self
    }
}

#[async_trait::async_trait]
impl Classifier for RemoteClassifier {
    async fn classify(&self, text: &str) -> Result<String> {
        let req_body = PredictRequest {
            text: text.to_string(),
        };

        // Make HTTP request with timeout
        let response = tokio::time::timeout(
            self.timeout,
            self.client
                .post(&self.base_url)
                .header("Content-Type", "application/json")
                .json(&req_body)
                .send(),
        )
        .await
        .context("classifier request timed out")?
        .context("classifier HTTP request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("classifier API error {}: {}", status, body);
        }

        let resp_body: PredictResponse = response
            .json()
            .await
            .context("failed to parse classifier response")?;

        Ok(resp_body.category)
    }
}

// Classification service request/response structures
#[derive(Debug, Serialize)]
struct PredictRequest {
    text: String,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    category: String,
}
