//! Section builders shared by every template.
//!
//! `is_visible` is the only place that decides whether a section appears, so a
//! field one template shows cannot be dropped by another.

use crate::models::{Certification, Education, Experience, ResumeRecord};
use crate::render::document::{EntryBlock, HeaderBlock, RenderedSection, SectionItem};
use crate::render::templates::{EntryStyle, SectionKind, TemplateDefinition};

/// A section is rendered only when it has content; empty sections get no heading.
pub fn is_visible(kind: SectionKind, record: &ResumeRecord) -> bool {
    match kind {
        SectionKind::Summary => !record.personal_info.summary.trim().is_empty(),
        SectionKind::Experience => !record.experiences.is_empty(),
        SectionKind::Education => !record.educations.is_empty(),
        SectionKind::Skills => !record.skills.is_empty(),
        SectionKind::Certifications => !record.certifications.is_empty(),
    }
}

pub fn build_header(record: &ResumeRecord) -> HeaderBlock {
    let info = &record.personal_info;
    HeaderBlock {
        name: info.name.trim().to_string(),
        contact: non_empty([&info.email, &info.phone, &info.location]),
        placeholder_name: !info.has_real_name(),
    }
}

/// Builds `kind` for `template`, or `None` when the record has nothing to show.
pub fn build_section(
    kind: SectionKind,
    record: &ResumeRecord,
    template: &TemplateDefinition,
) -> Option<RenderedSection> {
    if !is_visible(kind, record) {
        return None;
    }

    let entry_style = template.style.entry_style;
    let items = match kind {
        SectionKind::Summary => vec![SectionItem::Paragraph {
            text: record.personal_info.summary.trim().to_string(),
        }],
        SectionKind::Experience => record
            .experiences
            .iter()
            .map(|e| SectionItem::Entry(experience_block(e, entry_style)))
            .collect(),
        SectionKind::Education => record
            .educations
            .iter()
            .map(|e| SectionItem::Entry(education_block(e, entry_style)))
            .collect(),
        SectionKind::Skills => vec![SectionItem::Skills {
            skills: record.skills.clone(),
        }],
        SectionKind::Certifications => record
            .certifications
            .iter()
            .map(|c| SectionItem::Entry(certification_block(c)))
            .collect(),
    };

    Some(RenderedSection {
        kind,
        heading: template
            .style
            .heading_case
            .apply(template.labels.for_kind(kind)),
        items,
    })
}

fn experience_block(exp: &Experience, style: EntryStyle) -> EntryBlock {
    let (primary, secondary) = ordered(&exp.title, &exp.company, style);
    EntryBlock {
        primary,
        secondary,
        dates: exp.date_range(),
        details: non_empty([&exp.location]),
        body: exp.description.trim().to_string(),
    }
}

fn education_block(edu: &Education, style: EntryStyle) -> EntryBlock {
    let (primary, secondary) = ordered(&edu.degree, &edu.institution, style);
    let grade = if edu.grade.trim().is_empty() {
        String::new()
    } else {
        format!("Grade: {}", edu.grade.trim())
    };
    EntryBlock {
        primary,
        secondary,
        dates: edu.date_range(),
        details: non_empty([&edu.field_of_study, &grade]),
        body: String::new(),
    }
}

fn certification_block(cert: &Certification) -> EntryBlock {
    let credential = if cert.credential_id.trim().is_empty() {
        String::new()
    } else {
        format!("Credential ID: {}", cert.credential_id.trim())
    };
    let (primary, secondary) = ordered(
        &cert.name,
        &cert.issuing_organization,
        EntryStyle::TitleFirst,
    );
    EntryBlock {
        primary,
        secondary,
        dates: cert.issue_date.trim().to_string(),
        details: non_empty([&credential, &cert.credential_url]),
        body: String::new(),
    }
}

/// Orders (role, organization) per the template; the bold line is never left
/// blank while the other one has text.
fn ordered(role: &str, organization: &str, style: EntryStyle) -> (String, String) {
    let (first, second) = match style {
        EntryStyle::TitleFirst => (role.trim(), organization.trim()),
        EntryStyle::OrganizationFirst => (organization.trim(), role.trim()),
    };
    if first.is_empty() {
        (second.to_string(), String::new())
    } else {
        (first.to_string(), second.to_string())
    }
}

fn non_empty<const N: usize>(values: [&String; N]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
