//! Interactive Completion Merger: folds user answers for flagged gaps into a record.
//!
//! Always works on a copy. The input record is never touched, so a render of the
//! pre-merge record can keep reading it.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::completeness::{MissingField, MIN_EXPERIENCES};
use crate::models::{Education, EntryId, Experience, ResumeRecord};

/// Placeholder for the fields of a gap-filled entry the user was not asked about.
pub const PLACEHOLDER_NOT_SPECIFIED: &str = "Not specified";
/// Title given to an experience entry created from a free-text answer.
pub const PLACEHOLDER_EXPERIENCE_TITLE: &str = "Additional Experience";

/// User answers keyed by gap. Blank answers count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialAnswers {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    /// Becomes the `degree` of a new education entry.
    pub education: Option<String>,
    /// Becomes the `description` of a new experience entry.
    pub experience: Option<String>,
}

impl PartialAnswers {
    pub fn answer(&self, field: MissingField) -> Option<&str> {
        let slot = match field {
            MissingField::Name => &self.name,
            MissingField::Email => &self.email,
            MissingField::Phone => &self.phone,
            MissingField::Location => &self.location,
            MissingField::Summary => &self.summary,
            MissingField::Education => &self.education,
            MissingField::Experience => &self.experience,
        };
        slot.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn set(&mut self, field: MissingField, value: impl Into<String>) {
        let value = Some(value.into());
        match field {
            MissingField::Name => self.name = value,
            MissingField::Email => self.email = value,
            MissingField::Phone => self.phone = value,
            MissingField::Location => self.location = value,
            MissingField::Summary => self.summary = value,
            MissingField::Education => self.education = value,
            MissingField::Experience => self.experience = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        MissingField::ALL.iter().all(|f| self.answer(*f).is_none())
    }
}

/// Returns a new record with `answers` applied.
///
/// - non-blank scalar answers overwrite the matching personal-info field
/// - an education answer appends one entry, only when the record has none
/// - an experience answer appends one entry, only when the record has fewer than two
/// - any applied answers clear `suggestions`
///
/// With no usable answers the result equals the input.
pub fn merge(record: &ResumeRecord, answers: &PartialAnswers) -> ResumeRecord {
    let mut merged = record.clone();
    if answers.is_empty() {
        return merged;
    }

    let info = &mut merged.personal_info;
    for (field, slot) in [
        (MissingField::Name, &mut info.name),
        (MissingField::Email, &mut info.email),
        (MissingField::Phone, &mut info.phone),
        (MissingField::Location, &mut info.location),
        (MissingField::Summary, &mut info.summary),
    ] {
        if let Some(value) = answers.answer(field) {
            *slot = value.to_string();
        }
    }

    if let Some(degree) = answers.answer(MissingField::Education) {
        if merged.educations.is_empty() {
            merged.add_education(Education {
                id: EntryId::new(),
                degree: degree.to_string(),
                institution: PLACEHOLDER_NOT_SPECIFIED.to_string(),
                field_of_study: String::new(),
                start_date: String::new(),
                end_date: String::new(),
                grade: String::new(),
            });
        }
    }

    if let Some(description) = answers.answer(MissingField::Experience) {
        if merged.experiences.len() < MIN_EXPERIENCES {
            merged.add_experience(Experience {
                id: EntryId::new(),
                title: PLACEHOLDER_EXPERIENCE_TITLE.to_string(),
                company: PLACEHOLDER_NOT_SPECIFIED.to_string(),
                location: String::new(),
                start_date: PLACEHOLDER_NOT_SPECIFIED.to_string(),
                end_date: String::new(),
                is_current: false,
                description: description.to_string(),
            });
        }
    }

    merged.suggestions.clear();
    merged.normalize();

    info!(
        "Merged completion answers: {} experiences, {} educations",
        merged.experiences.len(),
        merged.educations.len()
    );
    merged
}
