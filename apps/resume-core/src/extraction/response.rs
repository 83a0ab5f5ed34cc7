//! Extraction response decoding.
//!
//! The service returns loosely shaped JSON. It is decoded here, once, into either a
//! fully defined [`Extraction`] or a `Malformed` reason. Nothing untyped leaves this module.
//!
//! Accepted shapes:
//! - camelCase or snake_case keys, singular or plural list names
//! - `null` or a missing field means empty
//! - the whole payload may sit under a `data` envelope or inside markdown code fences
//!
//! - dates, grades and credential ids given as bare numbers (`"startDate": 2021`)
//!
//! Rejected (`Malformed`): a body that is not JSON, a non-object top level, or a field
//! holding the wrong JSON type.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{
    Certification, Education, EntryId, Experience, PersonalInfo, ResumeRecord, PLACEHOLDER_NAME,
};

/// A normalized extraction: the record plus the extractor's improvement hints.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub record: ResumeRecord,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodedExtraction {
    Ok(Extraction),
    Malformed(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireResponse {
    #[serde(alias = "personal_info", alias = "personal")]
    personal_info: Option<WirePersonalInfo>,
    summary: Option<String>,
    #[serde(alias = "experience")]
    experiences: Option<Vec<WireExperience>>,
    #[serde(alias = "education")]
    educations: Option<Vec<WireEducation>>,
    #[serde(alias = "certification")]
    certifications: Option<Vec<WireCertification>>,
    skills: Option<Vec<String>>,
    suggestions: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WirePersonalInfo {
    #[serde(alias = "full_name", alias = "fullName")]
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    location: Option<String>,
    summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireExperience {
    #[serde(alias = "position", alias = "role")]
    title: Option<String>,
    company: Option<String>,
    location: Option<String>,
    #[serde(alias = "start_date", deserialize_with = "string_or_number")]
    start_date: Option<String>,
    #[serde(alias = "end_date", deserialize_with = "string_or_number")]
    end_date: Option<String>,
    #[serde(alias = "is_current", alias = "current")]
    is_current: Option<bool>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireEducation {
    degree: Option<String>,
    #[serde(alias = "school")]
    institution: Option<String>,
    #[serde(alias = "field_of_study", alias = "field")]
    field_of_study: Option<String>,
    #[serde(alias = "start_date", deserialize_with = "string_or_number")]
    start_date: Option<String>,
    #[serde(alias = "end_date", deserialize_with = "string_or_number")]
    end_date: Option<String>,
    #[serde(alias = "gpa", deserialize_with = "string_or_number")]
    grade: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireCertification {
    name: Option<String>,
    #[serde(alias = "issuing_organization", alias = "issuer")]
    issuing_organization: Option<String>,
    #[serde(alias = "issue_date", deserialize_with = "string_or_number")]
    issue_date: Option<String>,
    #[serde(alias = "credential_id", deserialize_with = "string_or_number")]
    credential_id: Option<String>,
    #[serde(alias = "credential_url", alias = "url")]
    credential_url: Option<String>,
}

/// Accepts `"2021"`, `2021` or `3.8`; anything else (bool, array, object) is still
/// a type error.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Loose>::deserialize(deserializer)?.map(|v| match v {
        Loose::Text(s) => s,
        Loose::Int(n) => n.to_string(),
        Loose::Float(f) => f.to_string(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Decoding
// ────────────────────────────────────────────────────────────────────────────

pub fn decode_response(body: &str) -> DecodedExtraction {
    let text = strip_json_fences(body);

    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => return DecodedExtraction::Malformed(format!("response is not valid JSON: {e}")),
    };

    let value = match unwrap_envelope(value) {
        Some(v) => v,
        None => {
            return DecodedExtraction::Malformed("expected a JSON object at top level".to_string())
        }
    };

    match serde_json::from_value::<WireResponse>(value) {
        Ok(wire) => DecodedExtraction::Ok(normalize(wire)),
        Err(e) => DecodedExtraction::Malformed(format!("unexpected field shape: {e}")),
    }
}

/// Returns the payload object, unwrapping a `{"data": {...}}` envelope when the
/// top level carries no record fields of its own.
fn unwrap_envelope(value: Value) -> Option<Value> {
    let Value::Object(mut map) = value else {
        return None;
    };
    let has_record_keys = ["personalInfo", "personal_info", "skills", "summary"]
        .iter()
        .any(|k| map.contains_key(*k));
    if !has_record_keys && matches!(map.get("data"), Some(Value::Object(_))) {
        return map.remove("data");
    }
    Some(Value::Object(map))
}

fn normalize(wire: WireResponse) -> Extraction {
    let personal = wire.personal_info.unwrap_or_default();

    let name = clean(personal.name);
    let summary = match clean(wire.summary) {
        s if s.is_empty() => clean(personal.summary),
        s => s,
    };

    let personal_info = PersonalInfo {
        name: if name.is_empty() {
            PLACEHOLDER_NAME.to_string()
        } else {
            name
        },
        email: clean(personal.email),
        phone: clean(personal.phone),
        location: clean(personal.location),
        summary,
    };

    let experiences = wire
        .experiences
        .unwrap_or_default()
        .into_iter()
        .map(experience_from_wire)
        .filter(|e| {
            !(e.title.is_empty()
                && e.company.is_empty()
                && e.description.is_empty()
                && e.start_date.is_empty())
        })
        .collect();

    let educations = wire
        .educations
        .unwrap_or_default()
        .into_iter()
        .map(|w| Education {
            id: EntryId::new(),
            degree: clean(w.degree),
            institution: clean(w.institution),
            field_of_study: clean(w.field_of_study),
            start_date: clean(w.start_date),
            end_date: clean(w.end_date),
            grade: clean(w.grade),
        })
        .filter(|e| !(e.degree.is_empty() && e.institution.is_empty()))
        .collect();

    let certifications = wire
        .certifications
        .unwrap_or_default()
        .into_iter()
        .map(|w| Certification {
            id: EntryId::new(),
            name: clean(w.name),
            issuing_organization: clean(w.issuing_organization),
            issue_date: clean(w.issue_date),
            credential_id: clean(w.credential_id),
            credential_url: clean(w.credential_url),
        })
        .filter(|c| !c.name.is_empty())
        .collect();

    let suggestions: Vec<String> = wire
        .suggestions
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let mut record = ResumeRecord {
        personal_info,
        skills: wire.skills.unwrap_or_default(),
        experiences,
        educations,
        certifications,
        suggestions: suggestions.clone(),
    };
    record.normalize();

    Extraction {
        record,
        suggestions,
    }
}

fn experience_from_wire(w: WireExperience) -> Experience {
    let mut end_date = clean(w.end_date);
    let mut is_current = w.is_current.unwrap_or(false);
    if matches!(
        end_date.to_lowercase().as_str(),
        "present" | "current" | "now"
    ) {
        is_current = true;
        end_date.clear();
    }

    Experience {
        id: EntryId::new(),
        title: clean(w.title),
        company: clean(w.company),
        location: clean(w.location),
        start_date: clean(w.start_date),
        end_date,
        is_current,
        description: clean(w.description),
    }
}

fn clean(value: Option<String>) -> String {
    value.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Strips ```json ... ``` or ``` ... ``` code fences around a payload.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_ok(body: &str) -> Extraction {
        match decode_response(body) {
            DecodedExtraction::Ok(e) => e,
            DecodedExtraction::Malformed(reason) => panic!("expected Ok, got Malformed: {reason}"),
        }
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_full_camel_case_response() {
        let body = r#"{
            "personalInfo": {"name": "Jane Doe", "email": "jane@x.com", "phone": "555-0100", "location": "NYC"},
            "summary": "Backend engineer with three years building Go and SQL services at scale.",
            "experiences": [{"title": "Backend Engineer", "company": "Acme", "startDate": "2021", "isCurrent": true}],
            "educations": [{"degree": "BS Computer Science", "institution": "State U"}],
            "skills": ["Go", "SQL"],
            "suggestions": ["Quantify your impact at Acme"]
        }"#;
        let extraction = decode_ok(body);
        let record = &extraction.record;
        assert_eq!(record.personal_info.name, "Jane Doe");
        assert_eq!(record.experiences.len(), 1);
        assert!(record.experiences[0].is_current);
        assert_eq!(record.educations[0].institution, "State U");
        assert_eq!(record.skills, vec!["Go", "SQL"]);
        assert_eq!(extraction.suggestions, vec!["Quantify your impact at Acme"]);
        assert_eq!(record.suggestions, extraction.suggestions);
    }

    #[test]
    fn test_missing_fields_become_empty() {
        let extraction = decode_ok("{}");
        let record = extraction.record;
        assert_eq!(record.personal_info.name, PLACEHOLDER_NAME);
        assert!(record.personal_info.email.is_empty());
        assert!(record.personal_info.summary.is_empty());
        assert!(record.experiences.is_empty());
        assert!(record.educations.is_empty());
        assert!(record.certifications.is_empty());
        assert!(record.skills.is_empty());
        assert!(extraction.suggestions.is_empty());
    }

    #[test]
    fn test_nulls_are_empty_not_errors() {
        let body = r#"{"personalInfo": null, "summary": null, "skills": null, "experience": null}"#;
        let record = decode_ok(body).record;
        assert_eq!(record.personal_info.name, PLACEHOLDER_NAME);
        assert!(record.skills.is_empty());
    }

    #[test]
    fn test_snake_case_and_singular_keys() {
        let body = r#"{
            "personal_info": {"name": "Sam", "summary": "From personal info"},
            "experience": [{"position": "Analyst", "company": "Beta", "start_date": "2019", "end_date": "Present"}],
            "education": [{"degree": "MBA", "school": "Tech U", "field_of_study": "Business"}]
        }"#;
        let record = decode_ok(body).record;
        assert_eq!(record.personal_info.summary, "From personal info");
        assert_eq!(record.experiences[0].title, "Analyst");
        assert!(record.experiences[0].is_current);
        assert!(record.experiences[0].end_date.is_empty());
        assert_eq!(record.educations[0].field_of_study, "Business");
    }

    #[test]
    fn test_data_envelope_and_fences() {
        let body = "```json\n{\"data\": {\"personalInfo\": {\"name\": \"Ana\"}}}\n```";
        assert_eq!(decode_ok(body).record.personal_info.name, "Ana");
    }

    #[test]
    fn test_current_flag_clears_end_date() {
        let body = r#"{"experiences": [{"title": "Lead", "endDate": "2024", "isCurrent": true}]}"#;
        let record = decode_ok(body).record;
        assert!(record.experiences[0].end_date.is_empty());
    }

    #[test]
    fn test_duplicate_skills_are_dropped() {
        let record = decode_ok(r#"{"skills": ["Go", "Go", " SQL "]}"#).record;
        assert_eq!(record.skills, vec!["Go", "SQL"]);
    }

    #[test]
    fn test_blank_entries_are_dropped() {
        let body = r#"{"experiences": [{}, {"title": "Dev"}], "certifications": [{"issuer": "AWS"}]}"#;
        let record = decode_ok(body).record;
        assert_eq!(record.experiences.len(), 1);
        assert!(record.certifications.is_empty());
    }

    #[test]
    fn test_numeric_dates_and_grades_are_accepted() {
        let body = r#"{
            "experience": [{"title": "Dev", "company": "Acme", "startDate": 2019, "endDate": 2021}],
            "education": [{"degree": "BS", "institution": "State U", "endDate": "2018", "gpa": 3.8}],
            "certifications": [{"name": "CKA", "issueDate": 2022, "credentialId": 123456}]
        }"#;
        let record = decode_ok(body).record;
        assert_eq!(record.experiences[0].start_date, "2019");
        assert_eq!(record.experiences[0].end_date, "2021");
        assert_eq!(record.educations[0].end_date, "2018");
        assert_eq!(record.educations[0].grade, "3.8");
        assert_eq!(record.certifications[0].issue_date, "2022");
        assert_eq!(record.certifications[0].credential_id, "123456");
    }

    #[test]
    fn test_boolean_date_is_still_malformed() {
        assert!(matches!(
            decode_response(r#"{"experience": [{"title": "Dev", "startDate": true}]}"#),
            DecodedExtraction::Malformed(_)
        ));
    }

    #[test]
    fn test_not_json_is_malformed() {
        assert!(matches!(
            decode_response("Sorry, I can't help with that."),
            DecodedExtraction::Malformed(_)
        ));
    }

    #[test]
    fn test_array_top_level_is_malformed() {
        assert!(matches!(
            decode_response("[1, 2, 3]"),
            DecodedExtraction::Malformed(_)
        ));
    }

    #[test]
    fn test_wrong_field_type_is_malformed() {
        assert!(matches!(
            decode_response(r#"{"skills": 42}"#),
            DecodedExtraction::Malformed(_)
        ));
    }
}
