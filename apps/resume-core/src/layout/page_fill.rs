//! Page Fill Analysis: does a rendered document fit on one page?
//!
//! The preview is a single letter page; anything beyond it is clipped there but
//! still exported. This module tells the host which case it is in so it can show
//! an overflow hint.

use serde::{Deserialize, Serialize};

use crate::layout::flow::layout_document;
use crate::layout::font_metrics::PageConfig;
use crate::render::document::RenderedDocument;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum PageFillVerdict {
    Fits,
    /// Export will produce `pages` pages; the preview shows only the first.
    Overflow { pages: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageFillAnalysis {
    pub pages: usize,
    /// Fraction of the last page's content height in use.
    pub last_page_fill: f32,
    /// Fraction of the first page left empty.
    pub whitespace_fraction: f32,
    pub verdict: PageFillVerdict,
}

// ────────────────────────────────────────────────────────────────────────────
// Core function
// ────────────────────────────────────────────────────────────────────────────

pub fn analyze_page_fill(doc: &RenderedDocument, config: &PageConfig) -> PageFillAnalysis {
    let laid_out = layout_document(doc, config);
    let pages = laid_out.len().max(1);
    let content_height = config.content_height();

    let fill_of = |used: f32| (used / content_height).clamp(0.0, 1.0);
    let first_fill = laid_out.first().map_or(0.0, |p| fill_of(p.used_height_pt));
    let last_page_fill = laid_out.last().map_or(0.0, |p| fill_of(p.used_height_pt));

    let verdict = if pages == 1 {
        PageFillVerdict::Fits
    } else {
        PageFillVerdict::Overflow { pages }
    };

    PageFillAnalysis {
        pages,
        last_page_fill,
        whitespace_fraction: 1.0 - first_fill,
        verdict,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::default_page_config;
    use crate::models::{Experience, ResumeRecord};
    use crate::render::render;
    use crate::render::templates::TemplateId;

    #[test]
    fn test_sparse_resume_fits() {
        let mut record = ResumeRecord::default();
        record.personal_info.name = "Jane Doe".into();
        record.add_experience(Experience::new("Backend Engineer", "Acme"));

        let analysis = analyze_page_fill(&render(&record, TemplateId::Classic), &default_page_config());
        assert_eq!(analysis.verdict, PageFillVerdict::Fits);
        assert_eq!(analysis.pages, 1);
        assert!(analysis.whitespace_fraction > 0.5, "got {}", analysis.whitespace_fraction);
    }

    #[test]
    fn test_long_resume_overflows() {
        let mut record = ResumeRecord::default();
        for i in 0..40 {
            let mut exp = Experience::new(format!("Role {i}"), "Acme");
            exp.description = "Shipped features across the stack every single week. ".repeat(5);
            record.add_experience(exp);
        }

        let analysis = analyze_page_fill(&render(&record, TemplateId::Tech), &default_page_config());
        match analysis.verdict {
            PageFillVerdict::Overflow { pages } => {
                assert!(pages >= 2);
                assert_eq!(pages, analysis.pages);
            }
            PageFillVerdict::Fits => panic!("expected overflow"),
        }
        assert!(analysis.whitespace_fraction < 0.2);
    }
}
