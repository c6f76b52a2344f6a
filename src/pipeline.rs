use std::time::Duration;

use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use tracing::{info, warn};

use crate::errors::{Error, Result};

/// Outbound notification to the speech-to-text/summarization service.
/// A 2xx acknowledges receipt only; completion arrives later via the
/// callback route, or never.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DispatchRequest {
    pub journal_id: String,
    pub template_id: Option<String>,
    pub language: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PipelineOutcome {
    Success,
    Failure,
}

/// Inbound completion payload. Delivery is at-least-once; duplicates and
/// stragglers are expected.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CompletionCallback {
    pub journal_id: String,
    pub transcript: Option<String>,
    pub summary: Option<String>,
    pub outcome: PipelineOutcome,
}

#[derive(Debug, Clone)]
pub struct PipelineGateway {
    http: reqwest::Client,
    base_url: String,
}

impl PipelineGateway {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Single blocking attempt, no retry loop. A failure is the caller's to
    /// see and a human's to retry via resummarize.
    pub async fn dispatch(
        &self,
        journal_id: &RecordId,
        template_id: Option<&RecordId>,
        language: Option<&str>,
    ) -> Result<()> {
        let body = DispatchRequest {
            journal_id: journal_id.to_string(),
            template_id: template_id.map(|id| id.to_string()),
            language: language.map(|l| l.to_string()),
        };

        let response = self
            .http
            .post(format!("{}/process", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::PipelineDispatchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::PipelineDispatchFailed(format!(
                "pipeline answered {}",
                response.status()
            )));
        }

        info!("dispatched journal {} to pipeline", body.journal_id);
        Ok(())
    }
}

/// Binary asset storage, reached only for best-effort deletes. The entity
/// store is the source of truth; a flaky asset backend must never block it.
#[derive(Debug, Clone)]
pub struct AssetStore {
    http: reqwest::Client,
    base_url: String,
}

impl AssetStore {
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Failures are logged and swallowed.
    pub async fn delete(&self, reference: &str) {
        let url = format!("{}/assets/{}", self.base_url, reference);
        match self.http.delete(&url).send().await {
            Ok(response) if response.status().is_success() => {
                info!("deleted audio asset {reference}");
            }
            Ok(response) => {
                warn!(
                    "asset store answered {} deleting {reference}",
                    response.status()
                );
            }
            Err(error) => {
                warn!("asset store unreachable deleting {reference}: {error}");
            }
        }
    }
}
