//! Narrative text from an uploaded PDF (e.g. a LinkedIn "Save to PDF" export).

use tracing::{debug, warn};

use crate::errors::PipelineError;

/// Extracts plain text from PDF bytes for use as `extract` input.
///
/// Blank lines are collapsed and trailing whitespace trimmed. A PDF that cannot be
/// parsed, or that carries no text layer, is a validation error.
pub fn text_from_pdf(bytes: &[u8]) -> Result<String, PipelineError> {
    if !bytes.starts_with(b"%PDF") {
        return Err(PipelineError::Validation(
            "The uploaded file is not a PDF.".to_string(),
        ));
    }

    // pdf-extract panics on some malformed inputs; treat that like any parse failure.
    let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));

    let raw = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("PDF text extraction failed: {e}");
            return Err(unreadable());
        }
        Err(_) => {
            warn!("PDF text extraction panicked");
            return Err(unreadable());
        }
    };

    let text = collapse_blank_lines(&raw);
    if text.is_empty() {
        return Err(PipelineError::Validation(
            "The PDF has no selectable text. Please paste your resume text instead.".to_string(),
        ));
    }

    debug!(
        "Extracted {} chars from {} byte PDF",
        text.chars().count(),
        bytes.len()
    );
    Ok(text)
}

fn unreadable() -> PipelineError {
    PipelineError::Validation(
        "We couldn't read that PDF. Please paste your resume text instead.".to_string(),
    )
}

fn collapse_blank_lines(raw: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in raw.lines().map(str::trim_end) {
        if line.trim().is_empty() && out.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        out.push(if line.trim().is_empty() { "" } else { line });
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_pdf_bytes_rejected() {
        let result = text_from_pdf(b"PK\x03\x04 this is a zip");
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[test]
    fn test_truncated_pdf_rejected() {
        let result = text_from_pdf(b"%PDF-1.7\n1 0 obj\n<<");
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[test]
    fn test_collapse_blank_lines() {
        let raw = "\n\nJane Doe   \n\n\n\nBackend Engineer\n\n";
        assert_eq!(collapse_blank_lines(raw), "Jane Doe\n\nBackend Engineer");
    }
}
