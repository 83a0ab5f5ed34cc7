//! Document Export: the rendered document, exactly as previewed, to PDF bytes.
//!
//! Export never goes back to the record. It lays out the `RenderedDocument` it is
//! handed and paints that, so the file matches the preview. Content longer than
//! one letter page continues on further pages rather than being cut off.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::errors::PipelineError;
use crate::layout::{
    layout_document, select_typeface, unsupported_chars, Orientation, PageConfig, PageFormat,
};
use crate::render::document::{HeaderBlock, RenderedDocument};

pub mod pdf;
pub mod sink;

pub use sink::{DirectorySink, DownloadSink, MemorySink, SavedExport};

/// Used when the record has no real name to build a filename from.
pub const FALLBACK_FILENAME: &str = "resume.pdf";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing has been rendered yet")]
    NotRendered,

    #[error("Invalid export options: {0}")]
    InvalidOptions(String),

    #[error("No font can draw: {}", .0.iter().collect::<String>())]
    UnsupportedCharacters(Vec<char>),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export task failed: {0}")]
    Task(String),
}

/// Mirrors the host's export options. `image_quality` and `scale_factor` apply to
/// raster capture; the vector output here validates them but does not need them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    pub margin_inches: f32,
    pub image_quality: f32,
    pub page_format: PageFormat,
    pub orientation: Orientation,
    pub scale_factor: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            margin_inches: 0.5,
            image_quality: 0.98,
            page_format: PageFormat::Letter,
            orientation: Orientation::Portrait,
            scale_factor: 2.0,
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> Result<(), ExportError> {
        if !(0.0..2.0).contains(&self.margin_inches) {
            return Err(ExportError::InvalidOptions(format!(
                "margin must be between 0 and 2 inches, got {}",
                self.margin_inches
            )));
        }
        if !(self.image_quality > 0.0 && self.image_quality <= 1.0) {
            return Err(ExportError::InvalidOptions(format!(
                "image quality must be in (0, 1], got {}",
                self.image_quality
            )));
        }
        if !(self.scale_factor > 0.0 && self.scale_factor <= 4.0) {
            return Err(ExportError::InvalidOptions(format!(
                "scale factor must be in (0, 4], got {}",
                self.scale_factor
            )));
        }
        Ok(())
    }

    pub fn page_config(&self) -> PageConfig {
        PageConfig::new(self.page_format, self.orientation, self.margin_inches)
    }
}

#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub filename: String,
    pub bytes: Bytes,
    pub pages: usize,
    pub generated_at: DateTime<Utc>,
}

/// `"Jane Doe"` → `"Jane_Doe_Resume.pdf"`. Placeholder or blank names get
/// [`FALLBACK_FILENAME`].
pub fn export_filename(header: &HeaderBlock) -> String {
    let name = header.name.trim();
    if header.placeholder_name || name.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("{stem}_Resume.pdf")
}

/// Exports exactly `doc`. Layout and painting run on the blocking pool.
///
/// Characters no available font can draw fail the export with
/// `ExportError::UnsupportedCharacters` rather than vanish from the file.
pub async fn export_to_pdf(
    doc: &RenderedDocument,
    options: &ExportOptions,
) -> Result<ExportedPdf, PipelineError> {
    options.validate()?;

    let config = options.page_config();
    let filename = export_filename(&doc.header);
    let title = format!("{} - Resume", doc.header.name);
    let snapshot = doc.clone();

    let (pages, bytes) = tokio::task::spawn_blocking(move || {
        let typeface = select_typeface(&snapshot);
        let laid_out = layout_document(&snapshot, &config);
        let missing = unsupported_chars(&laid_out, typeface);
        if !missing.is_empty() {
            return Err(ExportError::UnsupportedCharacters(missing));
        }
        pdf::paint_pdf(&laid_out, &config, typeface, &title).map(|bytes| (laid_out.len(), bytes))
    })
    .await
    .map_err(|e| {
        warn!("PDF export task failed: {e}");
        ExportError::Task(e.to_string())
    })??;

    if pages > 1 {
        info!("Resume content overflowed one page, exported {pages} pages");
    }
    info!(
        "Exported {} ({} bytes, template {})",
        filename,
        bytes.len(),
        doc.template
    );

    Ok(ExportedPdf {
        filename,
        bytes: Bytes::from(bytes),
        pages,
        generated_at: Utc::now(),
    })
}
