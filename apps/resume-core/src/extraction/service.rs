//! Extraction service transport, the only code that talks to the remote extractor.
//!
//! The service's internal behavior is opaque. This module sends the narrative text and
//! hands back the raw response body; decoding happens in `response.rs`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::extraction::ExtractionError;

const BACKOFF_BASE_MS: u64 = 500;

/// Anything that can turn narrative text into an extraction response body.
///
/// `HttpExtractionService` is the production backend; tests plug in canned bodies.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn fetch(&self, raw_text: &str) -> Result<String, ExtractionError>;
}

#[derive(Debug, Serialize)]
struct ExtractRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: ServiceErrorBody,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    message: String,
}

/// JSON-over-HTTP extraction backend with retry on 429, 5xx and transport errors.
#[derive(Clone)]
pub struct HttpExtractionService {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    max_retries: u32,
}

impl HttpExtractionService {
    pub fn new(config: &Config) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .timeout(config.extraction_timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: config.extraction_url.clone(),
            api_key: config.extraction_api_key.clone(),
            max_retries: config.extraction_max_retries.max(1),
        })
    }
}

#[async_trait]
impl ExtractionService for HttpExtractionService {
    async fn fetch(&self, raw_text: &str) -> Result<String, ExtractionError> {
        let request_body = ExtractRequest { text: raw_text };
        let mut last_error: Option<ExtractionError> = None;

        for attempt in 0..self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 500ms, 1s, 2s, ...
                let delay = Duration::from_millis(BACKOFF_BASE_MS * (1 << (attempt - 1)));
                warn!(
                    "Extraction attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.endpoint).json(&request_body);
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ExtractionError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Extraction service returned {}", status);
                last_error = Some(if status.as_u16() == 429 {
                    ExtractionError::RateLimited {
                        retries: self.max_retries,
                    }
                } else {
                    ExtractionError::Api {
                        status: status.as_u16(),
                        message: body,
                    }
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ServiceError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(ExtractionError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            if body.trim().is_empty() {
                return Err(ExtractionError::EmptyContent);
            }

            debug!("Extraction call succeeded: {} bytes", body.len());
            return Ok(body);
        }

        Err(last_error.unwrap_or(ExtractionError::RateLimited {
            retries: self.max_retries,
        }))
    }
}
