use thiserror::Error;

use crate::export::ExportError;
use crate::extraction::ExtractionError;

/// Pipeline-level error type.
///
/// Every public entry point returns `Result<T, PipelineError>`. Each variant is
/// recoverable at the boundary of the operation that raised it: the host turns it
/// into a dismissible message via [`PipelineError::user_message`] and the record is
/// left exactly as it was before the call.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Unknown template: '{0}'")]
    UnknownTemplate(String),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl PipelineError {
    /// Stable machine-readable code for the host UI.
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "VALIDATION_ERROR",
            PipelineError::Extraction(_) => "EXTRACTION_ERROR",
            PipelineError::UnknownTemplate(_) => "UNKNOWN_TEMPLATE",
            PipelineError::Export(_) => "EXPORT_ERROR",
        }
    }

    /// Message safe to show the user. Internal detail goes to the log instead.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::Validation(msg) => msg.clone(),
            PipelineError::Extraction(e) => {
                tracing::error!("Extraction error: {e}");
                "We couldn't analyze your text right now. Please try again.".to_string()
            }
            PipelineError::UnknownTemplate(id) => {
                tracing::error!("Unknown template requested: {id}");
                format!("The template '{id}' is not available. Please pick another template.")
            }
            PipelineError::Export(ExportError::NotRendered) => {
                "The resume preview isn't ready yet. Please wait for it to load and try again."
                    .to_string()
            }
            PipelineError::Export(ExportError::UnsupportedCharacters(chars)) => {
                let listed: String = chars.iter().take(10).collect();
                format!(
                    "Your resume contains characters the PDF fonts can't display ({listed}). \
                     Please replace them and export again."
                )
            }
            PipelineError::Export(e) => {
                tracing::error!("Export error: {e}");
                "We couldn't generate your PDF. Please try again.".to_string()
            }
        }
    }
}

impl From<crate::models::RecordError> for PipelineError {
    fn from(e: crate::models::RecordError) -> Self {
        PipelineError::Validation(e.to_string())
    }
}
