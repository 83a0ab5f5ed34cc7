//! The closed template catalogue.
//!
//! Every template renders the same five-plus sections through the same builders in
//! `sections.rs`; a template only decides presentation: order, heading labels and
//! casing, font, accent color, header arrangement and how skills are laid out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;
use crate::layout::FontFamily;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Modern,
    Classic,
    Creative,
    Executive,
    Minimalist,
    Tech,
    Academic,
    Startup,
}

/// Body sections. The header is not listed: every template opens with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0x11, 0x11, 0x11);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingCase {
    Upper,
    Title,
    Lower,
}

impl HeadingCase {
    pub fn apply(&self, label: &str) -> String {
        match self {
            HeadingCase::Upper => label.to_uppercase(),
            HeadingCase::Lower => label.to_lowercase(),
            HeadingCase::Title => label.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderLayout {
    Centered,
    LeftAligned,
    /// Name on the left, contact details stacked on the right.
    Split,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillsLayout {
    /// One wrapped line joined by the template's separator.
    Inline,
    /// Each skill boxed in brackets, wrapped.
    Tags,
    /// Two columns, one skill per cell.
    Columns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStyle {
    /// "Backend Engineer" then "Acme".
    TitleFirst,
    /// "Acme" then "Backend Engineer".
    OrganizationFirst,
}

/// Visual parameters consumed by the layout flow and the PDF painter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemplateStyle {
    pub font: FontFamily,
    pub accent: Rgb,
    pub text: Rgb,
    pub header_layout: HeaderLayout,
    pub heading_case: HeadingCase,
    /// Draw an accent rule under each section heading.
    pub heading_rule: bool,
    pub skills_layout: SkillsLayout,
    pub entry_style: EntryStyle,
    pub name_size_pt: f32,
    pub heading_size_pt: f32,
    pub body_size_pt: f32,
    pub separator: &'static str,
}

#[derive(Debug)]
pub struct TemplateDefinition {
    pub id: TemplateId,
    pub display_name: &'static str,
    pub description: &'static str,
    pub order: [SectionKind; 5],
    pub labels: SectionLabels,
    pub style: TemplateStyle,
}

#[derive(Debug)]
pub struct SectionLabels {
    pub summary: &'static str,
    pub experience: &'static str,
    pub education: &'static str,
    pub skills: &'static str,
    pub certifications: &'static str,
}

impl SectionLabels {
    pub fn for_kind(&self, kind: SectionKind) -> &'static str {
        match kind {
            SectionKind::Summary => self.summary,
            SectionKind::Experience => self.experience,
            SectionKind::Education => self.education,
            SectionKind::Skills => self.skills,
            SectionKind::Certifications => self.certifications,
        }
    }
}

const STANDARD_LABELS: SectionLabels = SectionLabels {
    summary: "Professional Summary",
    experience: "Work Experience",
    education: "Education",
    skills: "Skills",
    certifications: "Certifications",
};

use SectionKind::{Certifications, Education, Experience, Skills, Summary};

static MODERN: TemplateDefinition = TemplateDefinition {
    id: TemplateId::Modern,
    display_name: "Modern",
    description: "Clean sans-serif layout with a blue accent and skill tags.",
    order: [Summary, Experience, Skills, Education, Certifications],
    labels: STANDARD_LABELS,
    style: TemplateStyle {
        font: FontFamily::Helvetica,
        accent: Rgb::new(0x25, 0x63, 0xEB),
        text: Rgb::BLACK,
        header_layout: HeaderLayout::LeftAligned,
        heading_case: HeadingCase::Upper,
        heading_rule: true,
        skills_layout: SkillsLayout::Tags,
        entry_style: EntryStyle::TitleFirst,
        name_size_pt: 24.0,
        heading_size_pt: 12.0,
        body_size_pt: 10.0,
        separator: " | ",
    },
};

static CLASSIC: TemplateDefinition = TemplateDefinition {
    id: TemplateId::Classic,
    display_name: "Classic",
    description: "Traditional serif resume with a centered header.",
    order: [Summary, Experience, Education, Skills, Certifications],
    labels: STANDARD_LABELS,
    style: TemplateStyle {
        font: FontFamily::TimesRoman,
        accent: Rgb::BLACK,
        text: Rgb::BLACK,
        header_layout: HeaderLayout::Centered,
        heading_case: HeadingCase::Upper,
        heading_rule: true,
        skills_layout: SkillsLayout::Inline,
        entry_style: EntryStyle::TitleFirst,
        name_size_pt: 22.0,
        heading_size_pt: 12.0,
        body_size_pt: 10.5,
        separator: " | ",
    },
};

static CREATIVE: TemplateDefinition = TemplateDefinition {
    id: TemplateId::Creative,
    display_name: "Creative",
    description: "Bold purple accents with skills up front.",
    order: [Summary, Skills, Experience, Education, Certifications],
    labels: SectionLabels {
        summary: "About Me",
        experience: "Experience",
        education: "Education",
        skills: "What I Do",
        certifications: "Certifications",
    },
    style: TemplateStyle {
        font: FontFamily::Helvetica,
        accent: Rgb::new(0x7C, 0x3A, 0xED),
        text: Rgb::new(0x1F, 0x29, 0x37),
        header_layout: HeaderLayout::Split,
        heading_case: HeadingCase::Title,
        heading_rule: false,
        skills_layout: SkillsLayout::Tags,
        entry_style: EntryStyle::TitleFirst,
        name_size_pt: 26.0,
        heading_size_pt: 14.0,
        body_size_pt: 10.0,
        separator: " / ",
    },
};

static EXECUTIVE: TemplateDefinition = TemplateDefinition {
    id: TemplateId::Executive,
    display_name: "Executive",
    description: "Formal serif layout in navy, leadership history first.",
    order: [Summary, Experience, Education, Certifications, Skills],
    labels: SectionLabels {
        summary: "Executive Profile",
        experience: "Professional Experience",
        education: "Education",
        skills: "Core Competencies",
        certifications: "Certifications",
    },
    style: TemplateStyle {
        font: FontFamily::TimesRoman,
        accent: Rgb::new(0x1E, 0x3A, 0x5F),
        text: Rgb::BLACK,
        header_layout: HeaderLayout::Centered,
        heading_case: HeadingCase::Upper,
        heading_rule: true,
        skills_layout: SkillsLayout::Columns,
        entry_style: EntryStyle::OrganizationFirst,
        name_size_pt: 24.0,
        heading_size_pt: 12.5,
        body_size_pt: 10.5,
        separator: " | ",
    },
};

static MINIMALIST: TemplateDefinition = TemplateDefinition {
    id: TemplateId::Minimalist,
    display_name: "Minimalist",
    description: "Plenty of whitespace, lowercase headings, no rules.",
    order: [Summary, Experience, Education, Skills, Certifications],
    labels: SectionLabels {
        summary: "Summary",
        experience: "Experience",
        education: "Education",
        skills: "Skills",
        certifications: "Certifications",
    },
    style: TemplateStyle {
        font: FontFamily::Helvetica,
        accent: Rgb::new(0x6B, 0x72, 0x80),
        text: Rgb::new(0x37, 0x41, 0x51),
        header_layout: HeaderLayout::LeftAligned,
        heading_case: HeadingCase::Lower,
        heading_rule: false,
        skills_layout: SkillsLayout::Inline,
        entry_style: EntryStyle::TitleFirst,
        name_size_pt: 20.0,
        heading_size_pt: 11.0,
        body_size_pt: 10.0,
        separator: ", ",
    },
};

static TECH: TemplateDefinition = TemplateDefinition {
    id: TemplateId::Tech,
    display_name: "Tech",
    description: "Monospaced, green accent, tech stack before experience.",
    order: [Summary, Skills, Experience, Certifications, Education],
    labels: SectionLabels {
        summary: "Profile",
        experience: "Experience",
        education: "Education",
        skills: "Tech Stack",
        certifications: "Certifications",
    },
    style: TemplateStyle {
        font: FontFamily::Courier,
        accent: Rgb::new(0x05, 0x96, 0x69),
        text: Rgb::BLACK,
        header_layout: HeaderLayout::LeftAligned,
        heading_case: HeadingCase::Lower,
        heading_rule: true,
        skills_layout: SkillsLayout::Tags,
        entry_style: EntryStyle::TitleFirst,
        name_size_pt: 20.0,
        heading_size_pt: 11.5,
        body_size_pt: 9.5,
        separator: " | ",
    },
};

static ACADEMIC: TemplateDefinition = TemplateDefinition {
    id: TemplateId::Academic,
    display_name: "Academic",
    description: "Curriculum-vitae style with education leading.",
    order: [Summary, Education, Experience, Certifications, Skills],
    labels: SectionLabels {
        summary: "Research Interests",
        experience: "Academic & Professional Appointments",
        education: "Education",
        skills: "Skills",
        certifications: "Certifications & Honors",
    },
    style: TemplateStyle {
        font: FontFamily::TimesRoman,
        accent: Rgb::new(0x7F, 0x1D, 0x1D),
        text: Rgb::BLACK,
        header_layout: HeaderLayout::Centered,
        heading_case: HeadingCase::Title,
        heading_rule: true,
        skills_layout: SkillsLayout::Inline,
        entry_style: EntryStyle::OrganizationFirst,
        name_size_pt: 20.0,
        heading_size_pt: 12.5,
        body_size_pt: 10.5,
        separator: "; ",
    },
};

static STARTUP: TemplateDefinition = TemplateDefinition {
    id: TemplateId::Startup,
    display_name: "Startup",
    description: "Energetic orange accent, impact-first layout.",
    order: [Summary, Experience, Skills, Education, Certifications],
    labels: SectionLabels {
        summary: "The Pitch",
        experience: "Where I've Shipped",
        education: "Education",
        skills: "Toolbox",
        certifications: "Certifications",
    },
    style: TemplateStyle {
        font: FontFamily::Helvetica,
        accent: Rgb::new(0xEA, 0x58, 0x0C),
        text: Rgb::new(0x11, 0x18, 0x27),
        header_layout: HeaderLayout::Split,
        heading_case: HeadingCase::Upper,
        heading_rule: false,
        skills_layout: SkillsLayout::Tags,
        entry_style: EntryStyle::TitleFirst,
        name_size_pt: 24.0,
        heading_size_pt: 12.0,
        body_size_pt: 10.0,
        separator: " / ",
    },
};

impl TemplateId {
    pub const ALL: [TemplateId; 8] = [
        TemplateId::Modern,
        TemplateId::Classic,
        TemplateId::Creative,
        TemplateId::Executive,
        TemplateId::Minimalist,
        TemplateId::Tech,
        TemplateId::Academic,
        TemplateId::Startup,
    ];

    pub fn definition(&self) -> &'static TemplateDefinition {
        match self {
            TemplateId::Modern => &MODERN,
            TemplateId::Classic => &CLASSIC,
            TemplateId::Creative => &CREATIVE,
            TemplateId::Executive => &EXECUTIVE,
            TemplateId::Minimalist => &MINIMALIST,
            TemplateId::Tech => &TECH,
            TemplateId::Academic => &ACADEMIC,
            TemplateId::Startup => &STARTUP,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::Modern => "modern",
            TemplateId::Classic => "classic",
            TemplateId::Creative => "creative",
            TemplateId::Executive => "executive",
            TemplateId::Minimalist => "minimalist",
            TemplateId::Tech => "tech",
            TemplateId::Academic => "academic",
            TemplateId::Startup => "startup",
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.definition().display_name
    }

    pub fn description(&self) -> &'static str {
        self.definition().description
    }

    pub fn style(&self) -> TemplateStyle {
        self.definition().style
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the lowercase id. No fallback template.
impl FromStr for TemplateId {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateId::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PipelineError::UnknownTemplate(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_template_orders_all_sections_once() {
        for id in TemplateId::ALL {
            let order: HashSet<_> = id.definition().order.iter().copied().collect();
            assert_eq!(order.len(), 5, "{id} repeats a section");
        }
    }

    #[test]
    fn test_every_template_opens_with_summary() {
        for id in TemplateId::ALL {
            assert_eq!(id.definition().order[0], SectionKind::Summary, "{id}");
        }
    }

    #[test]
    fn test_definition_id_matches_variant() {
        for id in TemplateId::ALL {
            assert_eq!(id.definition().id, id);
        }
    }

    #[test]
    fn test_parse_roundtrips_display() {
        for id in TemplateId::ALL {
            assert_eq!(id.to_string().parse::<TemplateId>().unwrap(), id);
        }
    }

    #[test]
    fn test_unknown_template_is_rejected() {
        let err = "fancy".parse::<TemplateId>().unwrap_err();
        assert!(matches!(err, PipelineError::UnknownTemplate(ref id) if id == "fancy"));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Modern".parse::<TemplateId>().is_err());
    }

    #[test]
    fn test_heading_case() {
        assert_eq!(HeadingCase::Upper.apply("Work Experience"), "WORK EXPERIENCE");
        assert_eq!(HeadingCase::Lower.apply("Work Experience"), "work experience");
        assert_eq!(HeadingCase::Title.apply("Work Experience"), "Work Experience");
    }

    #[test]
    fn test_templates_are_visually_distinct() {
        let styles: Vec<_> = TemplateId::ALL.iter().map(|t| t.style()).collect();
        for (i, a) in styles.iter().enumerate() {
            for b in styles.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
