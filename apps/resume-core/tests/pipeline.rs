//! End to end: narrative text in, PDF file on disk out.

use std::sync::Arc;

use async_trait::async_trait;

use resume_core::export::{DirectorySink, DownloadSink};
use resume_core::extraction::{text_from_pdf, ExtractionError, ExtractionService};
use resume_core::{
    analyze, export_to_pdf, extract, merge, render, ExportOptions, ExtractionOutcome,
    ExtractorClient, MissingField, PartialAnswers, ResumeSession, TemplateId,
};

/// Pretends to be the extraction service; name comes back as the placeholder.
struct CannedService(&'static str);

#[async_trait]
impl ExtractionService for CannedService {
    async fn fetch(&self, _raw_text: &str) -> Result<String, ExtractionError> {
        Ok(self.0.to_string())
    }
}

const GAPPY_RESPONSE: &str = r#"```json
{
  "personalInfo": {"name": "", "email": "jane@x.com", "phone": null, "location": "NYC"},
  "summary": "Backend engineer with three years of experience building Go services at Acme.",
  "experience": [{"title": "Backend Engineer", "company": "Acme", "startDate": "2021", "endDate": "Present"}],
  "education": [{"degree": "BS Computer Science", "institution": "State U"}],
  "skills": ["Go", "SQL", "Go"],
  "suggestions": ["Add a phone number"]
}
```"#;

fn client() -> ExtractorClient {
    ExtractorClient::new(Arc::new(CannedService(GAPPY_RESPONSE)), 20_000)
}

fn squashed(bytes: &[u8]) -> String {
    pdf_extract::extract_text_from_mem(bytes)
        .unwrap()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[tokio::test]
async fn test_free_functions_end_to_end() {
    let extraction = extract(&client(), "Jane, Acme, Go, SQL").await.unwrap();
    let record = extraction.record;
    assert_eq!(record.skills, vec!["Go", "SQL"]);
    assert!(record.experiences[0].is_current);

    let report = analyze(&record);
    assert!(report.is_flagged(MissingField::Name));
    assert!(report.is_flagged(MissingField::Phone));

    let answers = PartialAnswers {
        name: Some("Jane Doe".into()),
        phone: Some("555-0100".into()),
        ..PartialAnswers::default()
    };
    let merged = merge(&record, &answers);
    assert!(merged.suggestions.is_empty());
    assert!(!analyze(&merged).is_flagged(MissingField::Name));

    let doc = render(&merged, TemplateId::Classic);
    let pdf = export_to_pdf(&doc, &ExportOptions::default()).await.unwrap();
    assert_eq!(pdf.filename, "Jane_Doe_Resume.pdf");

    let text = squashed(&pdf.bytes);
    assert!(text.contains("JaneDoe"));
    assert!(text.contains("Acme"));
    assert!(text.contains("555-0100"));
}

#[tokio::test]
async fn test_session_end_to_end_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path());

    let mut session = ResumeSession::new();
    let outcome = session.extract_with(&client(), "Jane, Acme, Go, SQL").await;
    assert_eq!(outcome, ExtractionOutcome::Applied);

    session.select_template(TemplateId::Tech);
    session.merge(&PartialAnswers {
        name: Some("Jane Doe".into()),
        ..PartialAnswers::default()
    });

    let saved = session.export(&sink).await.unwrap();
    assert!(saved.location.ends_with("Jane_Doe_Resume.pdf"));

    let bytes = std::fs::read(&saved.location).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(squashed(&bytes).contains("JaneDoe"));

    // A second export of the same render never clobbers the first file.
    let again = session.export(&sink).await.unwrap();
    assert_ne!(again.location, saved.location);
}

#[tokio::test]
async fn test_placeholder_name_exports_generic_filename() {
    let extraction = extract(&client(), "anonymous profile").await.unwrap();
    let doc = render(&extraction.record, TemplateId::Minimalist);
    let pdf = export_to_pdf(&doc, &ExportOptions::default()).await.unwrap();
    assert_eq!(pdf.filename, "resume.pdf");

    let dir = tempfile::tempdir().unwrap();
    let saved = DirectorySink::new(dir.path()).deliver(&pdf).await.unwrap();
    assert!(saved.location.ends_with("resume.pdf"));
}

#[tokio::test]
async fn test_exported_pdf_can_be_fed_back_as_input() {
    let extraction = extract(&client(), "Jane, Acme").await.unwrap();
    let mut record = extraction.record;
    record.personal_info.name = "Jane Doe".into();

    let doc = render(&record, TemplateId::Executive);
    let pdf = export_to_pdf(&doc, &ExportOptions::default()).await.unwrap();

    let text = text_from_pdf(&pdf.bytes).unwrap();
    let squashed: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    assert!(squashed.contains("JaneDoe"));
    assert!(client().validate_input(&text).is_ok());
}
