//! Template Rendering Engine.
//!
//! `render` is a pure function of (record, template): the same inputs always give
//! the same `RenderedDocument`. Templates differ in presentation only; which
//! sections appear is decided once in `sections::is_visible`.

pub mod document;
pub mod sections;
pub mod templates;

use tracing::debug;

use crate::errors::PipelineError;
use crate::layout::PageFormat;
use crate::models::ResumeRecord;

pub use document::{EntryBlock, HeaderBlock, RenderedDocument, RenderedSection, SectionItem};
pub use templates::{SectionKind, TemplateId};

pub fn render(record: &ResumeRecord, template: TemplateId) -> RenderedDocument {
    let definition = template.definition();

    let sections: Vec<RenderedSection> = definition
        .order
        .iter()
        .filter_map(|kind| sections::build_section(*kind, record, definition))
        .collect();

    debug!(
        "Rendered template {}: {} of {} sections visible",
        template,
        sections.len(),
        definition.order.len()
    );

    RenderedDocument {
        template,
        style: definition.style,
        page_format: PageFormat::Letter,
        header: sections::build_header(record),
        sections,
    }
}

/// Renders by template id string. Unknown ids fail; there is no fallback template.
pub fn render_named(record: &ResumeRecord, template_id: &str) -> Result<RenderedDocument, PipelineError> {
    let template: TemplateId = template_id.parse()?;
    Ok(render(record, template))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Certification, Education, Experience, PersonalInfo};

    fn full_record() -> ResumeRecord {
        let mut record = ResumeRecord {
            personal_info: PersonalInfo {
                name: "Jane Doe".into(),
                email: "jane@x.com".into(),
                phone: "555-0100".into(),
                location: "NYC".into(),
                summary: "Backend engineer with three years of experience building Go services."
                    .into(),
            },
            ..ResumeRecord::default()
        };
        let mut exp = Experience::new("Backend Engineer", "Acme");
        exp.start_date = "2021".into();
        exp.is_current = true;
        record.add_experience(exp);
        record.add_experience(Experience::new("Intern", "Beta Labs"));
        record.add_education(Education::new("BS Computer Science", "State U"));
        record.add_certification(Certification::new("AWS Solutions Architect", "Amazon"));
        for skill in ["Go", "SQL", "Kubernetes"] {
            record.add_skill(skill).unwrap();
        }
        record
    }

    #[test]
    fn test_every_template_preserves_content() {
        let record = full_record();
        for id in TemplateId::ALL {
            let text = render(&record, id).plain_text();
            let mut expected = vec![
                "Jane Doe",
                "jane@x.com",
                "555-0100",
                "NYC",
                "Backend Engineer",
                "Acme",
                "Intern",
                "Beta Labs",
                "BS Computer Science",
                "State U",
                "AWS Solutions Architect",
                "Amazon",
            ];
            expected.extend(record.skills.iter().map(String::as_str));
            for needle in expected {
                assert!(text.contains(needle), "{id} dropped {needle:?}");
            }
        }
    }

    #[test]
    fn test_empty_summary_omits_section_everywhere() {
        let mut record = full_record();
        record.personal_info.summary.clear();
        for id in TemplateId::ALL {
            let doc = render(&record, id);
            assert!(!doc.has_section(SectionKind::Summary), "{id}");
            let heading = id.definition().style.heading_case.apply(id.definition().labels.summary);
            assert!(doc.sections.iter().all(|s| s.heading != heading), "{id}");
        }
    }

    #[test]
    fn test_empty_record_renders_header_only() {
        let doc = render(&ResumeRecord::default(), TemplateId::Classic);
        assert!(doc.sections.is_empty());
        assert!(doc.header.placeholder_name);
    }

    #[test]
    fn test_classic_happy_path() {
        let doc = render(&full_record(), TemplateId::Classic);
        let text = doc.plain_text();
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Acme"));
        assert_eq!(
            doc.section_order(),
            vec![
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills,
                SectionKind::Certifications,
            ]
        );
    }

    #[test]
    fn test_templates_order_sections_differently() {
        let record = full_record();
        let tech = render(&record, TemplateId::Tech).section_order();
        let academic = render(&record, TemplateId::Academic).section_order();
        assert_eq!(tech[1], SectionKind::Skills);
        assert_eq!(academic[1], SectionKind::Education);
    }

    #[test]
    fn test_render_is_deterministic() {
        let record = full_record();
        for id in TemplateId::ALL {
            assert_eq!(render(&record, id), render(&record, id));
        }
    }

    #[test]
    fn test_render_named_rejects_unknown_template() {
        let result = render_named(&full_record(), "retro");
        assert!(matches!(result, Err(PipelineError::UnknownTemplate(ref id)) if id == "retro"));
        assert!(render_named(&full_record(), "startup").is_ok());
    }
}
