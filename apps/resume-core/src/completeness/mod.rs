//! Completeness Analyzer: finds required-field gaps in a record.
//!
//! Rules are independent of each other and of evaluation order. Flags are always
//! emitted in the fixed `MissingField::ALL` order so the same record yields the
//! same report.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::ResumeRecord;

pub mod merge;

pub use merge::{merge, PartialAnswers};

/// Summaries shorter than this count as missing.
pub const MIN_SUMMARY_CHARS: usize = 50;
/// Fewer experience entries than this is flagged.
pub const MIN_EXPERIENCES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Name,
    Email,
    Phone,
    Location,
    Summary,
    Education,
    Experience,
}

impl MissingField {
    pub const ALL: [MissingField; 7] = [
        MissingField::Name,
        MissingField::Email,
        MissingField::Phone,
        MissingField::Location,
        MissingField::Summary,
        MissingField::Education,
        MissingField::Experience,
    ];

    /// Label shown next to the input that fills this gap.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            MissingField::Name => "Full Name",
            MissingField::Email => "Email Address",
            MissingField::Phone => "Phone Number",
            MissingField::Location => "Location (City, State)",
            MissingField::Summary => "Professional Summary (at least 50 characters)",
            MissingField::Education => "Highest Degree (e.g. BS Computer Science)",
            MissingField::Experience => "Describe another role you have held",
        }
    }

    fn is_missing(&self, record: &ResumeRecord) -> bool {
        let info = &record.personal_info;
        match self {
            MissingField::Name => !info.has_real_name(),
            MissingField::Email => info.email.trim().is_empty(),
            MissingField::Phone => info.phone.trim().is_empty(),
            MissingField::Location => info.location.trim().is_empty(),
            MissingField::Summary => info.summary.trim().chars().count() < MIN_SUMMARY_CHARS,
            MissingField::Education => record.educations.is_empty(),
            MissingField::Experience => record.experiences.len() < MIN_EXPERIENCES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFieldFlag {
    pub field: MissingField,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub is_complete: bool,
    pub missing: Vec<MissingFieldFlag>,
}

impl CompletenessReport {
    pub fn is_flagged(&self, field: MissingField) -> bool {
        self.missing.iter().any(|f| f.field == field)
    }
}

/// Pure and deterministic: inspects the record, never touches it.
pub fn analyze(record: &ResumeRecord) -> CompletenessReport {
    let missing: Vec<MissingFieldFlag> = MissingField::ALL
        .iter()
        .filter(|field| field.is_missing(record))
        .map(|field| MissingFieldFlag {
            field: *field,
            label: field.prompt_label().to_string(),
        })
        .collect();

    debug!("Completeness analysis: {} gaps", missing.len());

    CompletenessReport {
        is_complete: missing.is_empty(),
        missing,
    }
}
