//! HTTP client for the hand-tracking service.

use crate::error::ClResult;
use airkeys_core::detection::Detector;
use airkeys_core::error::{AirKeysError, AkResult};
use airkeys_core::wire::ProcessFrameRequest;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Error bodies beyond this are cut before they reach the log.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpDetector {
    client: Client,
    endpoint: String,
}

impl HttpDetector {
    /// `endpoint` is the full `/process_frame` URL. No timeout when `timeout` is `None`.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> ClResult<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

impl Detector for HttpDetector {
    async fn process_frame(&self, request: &ProcessFrameRequest) -> AkResult<String> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| AirKeysError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AirKeysError::Transport(e.to_string()))?;
        debug!("{} -> {} ({} bytes)", self.endpoint, status, body.len());

        if !status.is_success() {
            return Err(AirKeysError::DetectorStatus {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }
        Ok(body)
    }
}
