//! Text Extractor Client: narrative text in, fully defined `ResumeRecord` out.
//!
//! Flow: validate input locally → `ExtractionService::fetch` → `decode_response`.
//! A failure at any step returns an error and produces no record, so the caller's
//! previous record is never partially overwritten.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::PipelineError;

pub mod pdf_input;
pub mod response;
pub mod service;

pub use pdf_input::text_from_pdf;
pub use response::{decode_response, DecodedExtraction, Extraction};
pub use service::{ExtractionService, HttpExtractionService};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Malformed extraction response: {0}")]
    Malformed(String),

    #[error("Extraction service returned empty content")]
    EmptyContent,
}

/// The single entry point for turning narrative text into a resume record.
#[derive(Clone)]
pub struct ExtractorClient {
    service: Arc<dyn ExtractionService>,
    max_input_chars: usize,
}

impl ExtractorClient {
    pub fn new(service: Arc<dyn ExtractionService>, max_input_chars: usize) -> Self {
        Self {
            service,
            max_input_chars,
        }
    }

    /// Builds a client backed by the HTTP extraction service described in `config`.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        let service = HttpExtractionService::new(config)?;
        Ok(Self::new(Arc::new(service), config.max_input_chars))
    }

    /// Local checks run before any network call. Returns the trimmed length in characters.
    pub fn validate_input(&self, raw_text: &str) -> Result<usize, PipelineError> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::Validation(
                "Please paste your profile or resume text before continuing.".to_string(),
            ));
        }
        let chars = trimmed.chars().count();
        if chars > self.max_input_chars {
            return Err(PipelineError::Validation(format!(
                "Text is too long ({chars} characters). Please keep it under {} characters.",
                self.max_input_chars
            )));
        }
        Ok(chars)
    }

    pub async fn extract(&self, raw_text: &str) -> Result<Extraction, PipelineError> {
        let chars = self.validate_input(raw_text)?;

        info!("Extracting resume from {chars} chars of text");
        let body = self.service.fetch(raw_text.trim()).await?;

        match decode_response(&body) {
            DecodedExtraction::Ok(extraction) => {
                info!(
                    "Extraction decoded: {} experiences, {} educations, {} skills, {} suggestions",
                    extraction.record.experiences.len(),
                    extraction.record.educations.len(),
                    extraction.record.skills.len(),
                    extraction.suggestions.len()
                );
                Ok(extraction)
            }
            DecodedExtraction::Malformed(reason) => {
                warn!("Extraction response rejected: {reason}");
                Err(ExtractionError::Malformed(reason).into())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{ScriptedService, JANE_DOE_RESPONSE};
    use super::*;

    fn client(service: Arc<ScriptedService>) -> ExtractorClient {
        ExtractorClient::new(service, 20_000)
    }

    #[tokio::test]
    async fn test_empty_input_rejected_before_network() {
        let service = Arc::new(ScriptedService::ok(JANE_DOE_RESPONSE));
        let result = client(service.clone()).extract("   \n\t ").await;
        assert!(matches!(result, Err(PipelineError::Validation(_))));
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_input_rejected_before_network() {
        let service = Arc::new(ScriptedService::ok(JANE_DOE_RESPONSE));
        let client = ExtractorClient::new(service.clone(), 10);
        let result = client.extract("this text is far longer than ten chars").await;
        assert!(matches!(result, Err(PipelineError::Validation(_))));
        assert_eq!(service.call_count(), 0);
    }

    #[test]
    fn test_input_length_counts_characters_not_bytes() {
        let client = client(Arc::new(ScriptedService::ok(JANE_DOE_RESPONSE)));
        assert_eq!(client.validate_input("  Иван Петров \n").unwrap(), 11);

        let tight = ExtractorClient::new(Arc::new(ScriptedService::ok(JANE_DOE_RESPONSE)), 11);
        assert!(tight.validate_input("Иван Петров").is_ok());
    }

    #[tokio::test]
    async fn test_happy_path_extraction() {
        let service = Arc::new(ScriptedService::ok(JANE_DOE_RESPONSE));
        let text = "Jane Doe, jane@x.com, 555-0100, NYC, 3 years as Backend Engineer at Acme, \
                    BS Computer Science from State U, skills: Go, SQL";
        let extraction = client(service).extract(text).await.unwrap();
        let record = extraction.record;
        assert_eq!(record.personal_info.name, "Jane Doe");
        assert_eq!(record.experiences.len(), 1);
        assert_eq!(record.educations.len(), 1);
        assert_eq!(record.skills.len(), 2);
        assert_eq!(extraction.suggestions.len(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_extraction_error() {
        let service = Arc::new(ScriptedService::new(vec![Err(ExtractionError::Api {
            status: 503,
            message: "unavailable".into(),
        })]));
        let result = client(service).extract("Jane Doe").await;
        assert!(matches!(result, Err(PipelineError::Extraction(_))));
    }

    #[tokio::test]
    async fn test_malformed_body_is_extraction_error() {
        let service = Arc::new(ScriptedService::ok("<html>502 Bad Gateway</html>"));
        let result = client(service).extract("Jane Doe").await;
        assert!(matches!(
            result,
            Err(PipelineError::Extraction(ExtractionError::Malformed(_)))
        ));
    }
}
