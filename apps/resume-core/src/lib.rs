//! Resume construction pipeline.
//!
//! Narrative text goes through five entry points:
//! - [`extract`] turns it into a [`ResumeRecord`] via the extraction service
//! - [`analyze`] lists the required fields still missing
//! - [`merge`] folds the user's answers for those gaps into a new record
//! - [`render`] projects a record through one of eight templates
//! - [`export_to_pdf`] turns the rendered document into a letter-size PDF
//!
//! [`ResumeSession`] owns the record between those steps for hosts that want
//! ordering, notices and export retries handled for them.

pub mod completeness;
pub mod config;
pub mod errors;
pub mod export;
pub mod extraction;
pub mod layout;
pub mod models;
pub mod render;
pub mod session;
pub mod telemetry;

pub use completeness::{analyze, merge, CompletenessReport, MissingField, PartialAnswers};
pub use config::Config;
pub use errors::PipelineError;
pub use export::{export_to_pdf, ExportOptions, ExportedPdf};
pub use extraction::{Extraction, ExtractorClient};
pub use models::ResumeRecord;
pub use render::{render, render_named, RenderedDocument, TemplateId};
pub use session::{ExtractionOutcome, Notice, ResumeSession};

/// Extracts a record from narrative text. Fails before any network call on
/// empty or oversized input.
pub async fn extract(client: &ExtractorClient, raw_text: &str) -> Result<Extraction, PipelineError> {
    client.extract(raw_text).await
}
