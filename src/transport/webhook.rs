//! Webhook delivery adapter.
//!
//! Ships the file as a single JSON POST: shared token, filename, MIME type
//! and the bytes as base64 text. Anything other than HTTP 200 is a
//! failure; the response body is kept (truncated) for diagnostics.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use tracing::info;

use super::{Transport, UploadError};
use crate::config::WebhookConfig;

/// Maximum bytes of a remote error body surfaced to the user.
const BODY_SNIPPET_LEN: usize = 300;

#[derive(Debug, Serialize)]
pub(crate) struct WebhookPayload<'a> {
    token: &'a str,
    filename: &'a str,
    mimetype: &'a str,
    content_b64: String,
}

pub struct WebhookTransport {
    config: WebhookConfig,
    http: reqwest::Client,
}

impl WebhookTransport {
    pub fn new(config: WebhookConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub(crate) fn payload<'a>(&'a self, filename: &'a str, bytes: &[u8]) -> WebhookPayload<'a> {
        WebhookPayload {
            token: &self.config.token,
            filename,
            mimetype: "text/csv",
            content_b64: STANDARD.encode(bytes),
        }
    }
}

#[async_trait]
impl Transport for WebhookTransport {
    fn name(&self) -> &'static str {
        "Webhook"
    }

    async fn upload(&self, filename: &str, bytes: &[u8]) -> Result<(), UploadError> {
        if self.config.url.is_empty() || self.config.token.is_empty() {
            return Err(UploadError::Config(
                "webhook settings missing (WEBHOOK_URL / WEBHOOK_TOKEN)".to_string(),
            ));
        }

        let response = self
            .http
            .post(&self.config.url)
            .json(&self.payload(filename, bytes))
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() != 200 {
            let body = response.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(BODY_SNIPPET_LEN).collect();
            return Err(UploadError::Remote(format!(
                "webhook returned {}: {}",
                status.as_u16(),
                snippet
            )));
        }

        info!("uploaded {} ({} bytes) via webhook", filename, bytes.len());
        Ok(())
    }
}
