//! Resume Record: the canonical structured representation of one resume.
//!
//! Optional data is always an empty string or an empty list, never absent, so the
//! renderer and the analyzer only ever check for emptiness.
//!
//! Invariants held by every mutation in this module:
//! - entry ids are unique within their own list and are never reused after removal
//! - `skills` has no duplicates (case-sensitive exact match)
//! - an experience with `is_current = true` has an empty `end_date`

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stand-in name used when the extractor could not find one.
/// The completeness analyzer treats it the same as an empty name.
pub const PLACEHOLDER_NAME: &str = "Your Name";

// ────────────────────────────────────────────────────────────────────────────
// Identity
// ────────────────────────────────────────────────────────────────────────────

/// Position-independent identity of an experience, education or certification entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Anything that lives in one of the record's identified lists.
pub trait Entry {
    fn id(&self) -> EntryId;
    fn set_id(&mut self, id: EntryId);
    /// Brings the entry back in line with its own invariants after an edit.
    fn enforce(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Skill must not be empty")]
    EmptySkill,

    #[error("Skill '{0}' is already listed")]
    DuplicateSkill(String),

    #[error("No entry with id {0}")]
    UnknownEntry(EntryId),
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
}

impl PersonalInfo {
    /// True when `name` holds something other than blank text or the placeholder.
    pub fn has_real_name(&self) -> bool {
        let name = self.name.trim();
        !name.is_empty() && name != PLACEHOLDER_NAME
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: EntryId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub description: String,
}

impl Experience {
    pub fn new(title: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            title: title.into(),
            company: company.into(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            is_current: false,
            description: String::new(),
        }
    }

    /// "start - end", "start - Present", or whichever half is known.
    pub fn date_range(&self) -> String {
        let end = if self.is_current {
            "Present"
        } else {
            self.end_date.trim()
        };
        join_range(self.start_date.trim(), end)
    }
}

impl Entry for Experience {
    fn id(&self) -> EntryId {
        self.id
    }

    fn set_id(&mut self, id: EntryId) {
        self.id = id;
    }

    fn enforce(&mut self) {
        if self.is_current {
            self.end_date.clear();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: EntryId,
    pub degree: String,
    pub institution: String,
    pub field_of_study: String,
    pub start_date: String,
    pub end_date: String,
    pub grade: String,
}

impl Education {
    pub fn new(degree: impl Into<String>, institution: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            degree: degree.into(),
            institution: institution.into(),
            field_of_study: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            grade: String::new(),
        }
    }

    pub fn date_range(&self) -> String {
        join_range(self.start_date.trim(), self.end_date.trim())
    }
}

impl Entry for Education {
    fn id(&self) -> EntryId {
        self.id
    }

    fn set_id(&mut self, id: EntryId) {
        self.id = id;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub id: EntryId,
    pub name: String,
    pub issuing_organization: String,
    pub issue_date: String,
    pub credential_id: String,
    pub credential_url: String,
}

impl Certification {
    pub fn new(name: impl Into<String>, issuing_organization: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            name: name.into(),
            issuing_organization: issuing_organization.into(),
            issue_date: String::new(),
            credential_id: String::new(),
            credential_url: String::new(),
        }
    }
}

impl Entry for Certification {
    fn id(&self) -> EntryId {
        self.id
    }

    fn set_id(&mut self, id: EntryId) {
        self.id = id;
    }
}

fn join_range(start: &str, end: &str) -> String {
    match (start.is_empty(), end.is_empty()) {
        (false, false) => format!("{start} - {end}"),
        (false, true) => start.to_string(),
        (true, false) => end.to_string(),
        (true, true) => String::new(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Record
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub personal_info: PersonalInfo,
    pub skills: Vec<String>,
    pub experiences: Vec<Experience>,
    pub educations: Vec<Education>,
    pub certifications: Vec<Certification>,
    /// Advisory hints from the extractor. Never enforced.
    pub suggestions: Vec<String>,
}

impl Default for ResumeRecord {
    fn default() -> Self {
        Self {
            personal_info: PersonalInfo {
                name: PLACEHOLDER_NAME.to_string(),
                ..PersonalInfo::default()
            },
            skills: Vec::new(),
            experiences: Vec::new(),
            educations: Vec::new(),
            certifications: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}

impl ResumeRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    // ── skills ──────────────────────────────────────────────────────────────

    /// Appends a skill. Surrounding whitespace is trimmed; exact duplicates are rejected.
    pub fn add_skill(&mut self, skill: &str) -> Result<(), RecordError> {
        let skill = skill.trim();
        if skill.is_empty() {
            return Err(RecordError::EmptySkill);
        }
        if self.skills.iter().any(|s| s == skill) {
            return Err(RecordError::DuplicateSkill(skill.to_string()));
        }
        self.skills.push(skill.to_string());
        Ok(())
    }

    /// Returns false when the skill was not listed.
    pub fn remove_skill(&mut self, skill: &str) -> bool {
        let before = self.skills.len();
        self.skills.retain(|s| s != skill);
        self.skills.len() != before
    }

    // ── identified lists ────────────────────────────────────────────────────

    pub fn add_experience(&mut self, experience: Experience) -> EntryId {
        push_entry(&mut self.experiences, experience)
    }

    pub fn update_experience(
        &mut self,
        id: EntryId,
        edit: impl FnOnce(&mut Experience),
    ) -> Result<(), RecordError> {
        update_entry(&mut self.experiences, id, edit)
    }

    pub fn remove_experience(&mut self, id: EntryId) -> Result<Experience, RecordError> {
        remove_entry(&mut self.experiences, id)
    }

    pub fn add_education(&mut self, education: Education) -> EntryId {
        push_entry(&mut self.educations, education)
    }

    pub fn update_education(
        &mut self,
        id: EntryId,
        edit: impl FnOnce(&mut Education),
    ) -> Result<(), RecordError> {
        update_entry(&mut self.educations, id, edit)
    }

    pub fn remove_education(&mut self, id: EntryId) -> Result<Education, RecordError> {
        remove_entry(&mut self.educations, id)
    }

    pub fn add_certification(&mut self, certification: Certification) -> EntryId {
        push_entry(&mut self.certifications, certification)
    }

    pub fn update_certification(
        &mut self,
        id: EntryId,
        edit: impl FnOnce(&mut Certification),
    ) -> Result<(), RecordError> {
        update_entry(&mut self.certifications, id, edit)
    }

    pub fn remove_certification(&mut self, id: EntryId) -> Result<Certification, RecordError> {
        remove_entry(&mut self.certifications, id)
    }

    /// Re-establishes every record invariant. Used on data that did not come
    /// through the edit methods (extraction responses, deserialized records).
    pub fn normalize(&mut self) {
        let mut seen = HashSet::new();
        self.skills = std::mem::take(&mut self.skills)
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();

        enforce_list(&mut self.experiences);
        enforce_list(&mut self.educations);
        enforce_list(&mut self.certifications);

        if self.personal_info.name.trim().is_empty() {
            self.personal_info.name = PLACEHOLDER_NAME.to_string();
        }
    }
}

/// Added entries always get a fresh id, so an id freed by a removal never returns.
fn push_entry<T: Entry>(list: &mut Vec<T>, mut entry: T) -> EntryId {
    let id = EntryId::new();
    entry.set_id(id);
    entry.enforce();
    list.push(entry);
    id
}

fn update_entry<T: Entry>(
    list: &mut [T],
    id: EntryId,
    edit: impl FnOnce(&mut T),
) -> Result<(), RecordError> {
    let entry = list
        .iter_mut()
        .find(|e| e.id() == id)
        .ok_or(RecordError::UnknownEntry(id))?;
    edit(entry);
    // Edits never change identity.
    entry.set_id(id);
    entry.enforce();
    Ok(())
}

fn remove_entry<T: Entry>(list: &mut Vec<T>, id: EntryId) -> Result<T, RecordError> {
    let pos = list
        .iter()
        .position(|e| e.id() == id)
        .ok_or(RecordError::UnknownEntry(id))?;
    Ok(list.remove(pos))
}

fn enforce_list<T: Entry>(list: &mut [T]) {
    let mut seen = HashSet::new();
    for entry in list.iter_mut() {
        while !seen.insert(entry.id()) {
            entry.set_id(EntryId::new());
        }
        entry.enforce();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record_uses_placeholder_name() {
        let record = ResumeRecord::default();
        assert_eq!(record.personal_info.name, PLACEHOLDER_NAME);
        assert!(!record.personal_info.has_real_name());
        assert!(record.skills.is_empty());
        assert!(record.suggestions.is_empty());
    }

    #[test]
    fn test_add_skill_rejects_exact_duplicate() {
        let mut record = ResumeRecord::default();
        record.add_skill("Rust").unwrap();
        assert_eq!(
            record.add_skill(" Rust "),
            Err(RecordError::DuplicateSkill("Rust".to_string()))
        );
        assert_eq!(record.skills, vec!["Rust"]);
    }

    #[test]
    fn test_add_skill_is_case_sensitive() {
        let mut record = ResumeRecord::default();
        record.add_skill("sql").unwrap();
        record.add_skill("SQL").unwrap();
        assert_eq!(record.skills.len(), 2);
    }

    #[test]
    fn test_add_skill_rejects_blank() {
        let mut record = ResumeRecord::default();
        assert_eq!(record.add_skill("   "), Err(RecordError::EmptySkill));
    }

    #[test]
    fn test_remove_skill_reports_absence() {
        let mut record = ResumeRecord::default();
        record.add_skill("Go").unwrap();
        assert!(record.remove_skill("Go"));
        assert!(!record.remove_skill("Go"));
    }

    #[test]
    fn test_current_experience_drops_end_date_on_add() {
        let mut record = ResumeRecord::default();
        let mut exp = Experience::new("Engineer", "Acme");
        exp.end_date = "2024".to_string();
        exp.is_current = true;
        let id = record.add_experience(exp);
        let stored = record.experiences.iter().find(|e| e.id == id).unwrap();
        assert!(stored.end_date.is_empty());
    }

    #[test]
    fn test_update_experience_enforces_current_and_keeps_id() {
        let mut record = ResumeRecord::default();
        let mut exp = Experience::new("Engineer", "Acme");
        exp.end_date = "2023".to_string();
        let id = record.add_experience(exp);

        record
            .update_experience(id, |e| {
                e.is_current = true;
                e.id = EntryId::new();
            })
            .unwrap();

        assert_eq!(record.experiences[0].id, id);
        assert!(record.experiences[0].end_date.is_empty());
    }

    #[test]
    fn test_duplicate_id_is_reassigned_on_add() {
        let mut record = ResumeRecord::default();
        let edu = Education::new("BS", "State U");
        let first = record.add_education(edu.clone());
        let second = record.add_education(edu);
        assert_ne!(first, second);
    }

    #[test]
    fn test_remove_unknown_entry_fails() {
        let mut record = ResumeRecord::default();
        let missing = EntryId::new();
        assert_eq!(
            record.remove_certification(missing),
            Err(RecordError::UnknownEntry(missing))
        );
    }

    #[test]
    fn test_removed_id_not_reused() {
        let mut record = ResumeRecord::default();
        let old = record.add_experience(Experience::new("A", "X"));
        record.remove_experience(old).unwrap();
        let new = record.add_experience(Experience::new("A", "X"));
        assert_ne!(old, new);
    }

    #[test]
    fn test_readding_removed_entry_gets_fresh_id() {
        let mut record = ResumeRecord::default();
        let old = record.add_certification(Certification::new("CKA", "CNCF"));
        let removed = record.remove_certification(old).unwrap();
        assert_eq!(removed.id, old);

        let new = record.add_certification(removed);
        assert_ne!(new, old);
        assert_eq!(record.certifications[0].id, new);
        assert_eq!(record.certifications[0].name, "CKA");
    }

    #[test]
    fn test_normalize_dedups_skills_and_ids() {
        let mut record = ResumeRecord::default();
        record.skills = vec![
            "Go".to_string(),
            " Go".to_string(),
            "".to_string(),
            "SQL".to_string(),
        ];
        let exp = Experience::new("A", "X");
        record.experiences = vec![exp.clone(), exp];
        record.personal_info.name = "  ".to_string();

        record.normalize();

        assert_eq!(record.skills, vec!["Go", "SQL"]);
        assert_ne!(record.experiences[0].id, record.experiences[1].id);
        assert_eq!(record.personal_info.name, PLACEHOLDER_NAME);
    }

    #[test]
    fn test_date_range_formats() {
        let mut exp = Experience::new("A", "X");
        exp.start_date = "2021".to_string();
        exp.is_current = true;
        assert_eq!(exp.date_range(), "2021 - Present");

        let mut edu = Education::new("BS", "U");
        assert_eq!(edu.date_range(), "");
        edu.end_date = "2019".to_string();
        assert_eq!(edu.date_range(), "2019");
    }
}
