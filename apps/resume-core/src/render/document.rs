use serde::Serialize;

use crate::layout::PageFormat;
use crate::render::templates::{SectionKind, TemplateId, TemplateStyle};

/// A record projected through one template. Pure data: the preview draws it and
/// the exporter paints exactly this value, never a fresh render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub template: TemplateId,
    pub style: TemplateStyle,
    pub page_format: PageFormat,
    pub header: HeaderBlock,
    pub sections: Vec<RenderedSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderBlock {
    pub name: String,
    /// Non-empty contact details in display order (email, phone, location).
    pub contact: Vec<String>,
    /// True when `name` is the placeholder rather than a real name.
    pub placeholder_name: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedSection {
    pub kind: SectionKind,
    /// Heading text with the template's casing already applied.
    pub heading: String,
    pub items: Vec<SectionItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionItem {
    Paragraph { text: String },
    Entry(EntryBlock),
    Skills { skills: Vec<String> },
}

/// One experience, education or certification entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryBlock {
    /// Bold first line.
    pub primary: String,
    /// Second line (organization or role, depending on the template).
    pub secondary: String,
    /// Right-aligned dates.
    pub dates: String,
    /// Location, grade, credential id and the like.
    pub details: Vec<String>,
    pub body: String,
}

impl RenderedDocument {
    pub fn section(&self, kind: SectionKind) -> Option<&RenderedSection> {
        self.sections.iter().find(|s| s.kind == kind)
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.section(kind).is_some()
    }

    pub fn section_order(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    /// Every piece of visible text, one per line, in reading order.
    pub fn plain_text(&self) -> String {
        let mut lines = vec![self.header.name.clone()];
        lines.extend(self.header.contact.iter().cloned());

        for section in &self.sections {
            lines.push(section.heading.clone());
            for item in &section.items {
                match item {
                    SectionItem::Paragraph { text } => lines.push(text.clone()),
                    SectionItem::Skills { skills } => lines.extend(skills.iter().cloned()),
                    SectionItem::Entry(entry) => {
                        lines.extend(
                            [&entry.primary, &entry.secondary, &entry.dates]
                                .into_iter()
                                .filter(|s| !s.is_empty())
                                .cloned(),
                        );
                        lines.extend(entry.details.iter().cloned());
                        if !entry.body.is_empty() {
                            lines.push(entry.body.clone());
                        }
                    }
                }
            }
        }
        lines.join("\n")
    }
}
