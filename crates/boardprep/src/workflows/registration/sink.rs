use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use super::payload::SubmissionPayload;

/// Outbound boundary receiving packaged registrations (e.g. a spreadsheet web app).
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), SinkError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("failed to encode submission payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("submission transport failed: {0}")]
    Transport(String),
    #[error("submission endpoint rejected the payload with status {status}")]
    Rejected { status: u16 },
    #[error("no submission endpoint is configured")]
    NotConfigured,
}

/// How the HTTP sink interprets a completed request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SinkMode {
    /// Non-2xx responses are failures.
    #[default]
    StatusChecked,
    /// Any completed request counts as delivered; only transport errors fail.
    Opaque,
}

impl SinkMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "status" | "status_checked" | "checked" => Some(Self::StatusChecked),
            "opaque" | "no-cors" | "fire_and_forget" => Some(Self::Opaque),
            _ => None,
        }
    }
}

/// POSTs the payload as a `text/plain` JSON body to a fixed endpoint.
#[derive(Debug, Clone)]
pub struct HttpSubmissionSink {
    client: reqwest::Client,
    endpoint: String,
    mode: SinkMode,
}

impl HttpSubmissionSink {
    pub fn new(endpoint: impl Into<String>, mode: SinkMode) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| SinkError::Transport(err.to_string()))?;
        Ok(Self::with_client(client, endpoint, mode))
    }

    pub fn with_client(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        mode: SinkMode,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            mode,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn mode(&self) -> SinkMode {
        self.mode
    }
}

#[async_trait]
impl SubmissionSink for HttpSubmissionSink {
    async fn deliver(&self, payload: &SubmissionPayload) -> Result<(), SinkError> {
        let body = payload.to_body()?;
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|err| SinkError::Transport(err.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), mode = ?self.mode, "submission endpoint responded");

        match self.mode {
            SinkMode::Opaque => Ok(()),
            SinkMode::StatusChecked if status.is_success() => Ok(()),
            SinkMode::StatusChecked => {
                warn!(status = status.as_u16(), "submission endpoint rejected payload");
                Err(SinkError::Rejected {
                    status: status.as_u16(),
                })
            }
        }
    }
}

/// Stand-in used when no endpoint is configured; every delivery fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredSink;

#[async_trait]
impl SubmissionSink for UnconfiguredSink {
    async fn deliver(&self, _payload: &SubmissionPayload) -> Result<(), SinkError> {
        Err(SinkError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_mode_parses_known_aliases() {
        assert_eq!(SinkMode::parse("status"), Some(SinkMode::StatusChecked));
        assert_eq!(SinkMode::parse(" Opaque "), Some(SinkMode::Opaque));
        assert_eq!(SinkMode::parse("no-cors"), Some(SinkMode::Opaque));
        assert_eq!(SinkMode::parse("retry"), None);
    }
}
