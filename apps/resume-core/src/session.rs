//! Resume session, the single owner of the record being edited.
//!
//! The record is an immutable snapshot behind an `Arc`; every change builds a new
//! snapshot and swaps it in whole, so a failed operation can never leave a
//! half-applied record behind and readers of an older snapshot are unaffected.
//! The current render is a projection of the latest snapshot and is refreshed on
//! every change while a template is selected.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::completeness::{self, CompletenessReport, PartialAnswers};
use crate::errors::PipelineError;
use crate::export::{export_to_pdf, DownloadSink, ExportError, ExportOptions, SavedExport};
use crate::extraction::{Extraction, ExtractorClient};
use crate::layout::{analyze_page_fill, PageFillAnalysis};
use crate::models::{PersonalInfo, RecordError, ResumeRecord};
use crate::render::{render, RenderedDocument, TemplateId};

/// A dismissible, user-facing message produced from a `PipelineError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub code: &'static str,
    pub message: String,
}

/// Identifies one extraction request. Only the most recently issued ticket may
/// apply its result.
#[derive(Debug, Clone)]
pub struct ExtractionTicket {
    request_id: u64,
    text: String,
}

impl ExtractionTicket {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// The extracted record replaced the previous one.
    Applied,
    /// Input was rejected or the call failed; a notice was raised and the record kept.
    Failed,
    /// A newer request was issued after this one; the result was dropped.
    Stale,
    /// The session was closed before the result arrived; the result was dropped.
    Closed,
}

pub struct ResumeSession {
    record: Arc<ResumeRecord>,
    template: Option<TemplateId>,
    rendered: Option<Arc<RenderedDocument>>,
    export_options: ExportOptions,
    notices: Vec<Notice>,
    next_notice_id: u64,
    latest_request: u64,
    closed: bool,
}

impl Default for ResumeSession {
    fn default() -> Self {
        Self::with_record(ResumeRecord::default())
    }
}

impl ResumeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut record: ResumeRecord) -> Self {
        record.normalize();
        Self {
            record: Arc::new(record),
            template: None,
            rendered: None,
            export_options: ExportOptions::default(),
            notices: Vec::new(),
            next_notice_id: 1,
            latest_request: 0,
            closed: false,
        }
    }

    // ── read access ─────────────────────────────────────────────────────────

    /// The latest snapshot. Cheap to clone and safe to keep across later edits.
    pub fn record(&self) -> Arc<ResumeRecord> {
        Arc::clone(&self.record)
    }

    pub fn template(&self) -> Option<TemplateId> {
        self.template
    }

    pub fn rendered(&self) -> Option<&RenderedDocument> {
        self.rendered.as_deref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn export_options(&self) -> ExportOptions {
        self.export_options
    }

    pub fn set_export_options(&mut self, options: ExportOptions) -> Result<(), PipelineError> {
        if let Err(e) = options.validate() {
            return Err(self.raise(e.into()));
        }
        self.export_options = options;
        Ok(())
    }

    // ── notices ─────────────────────────────────────────────────────────────

    /// Records `err` as a notice and hands it back for the caller to return.
    fn raise(&mut self, err: PipelineError) -> PipelineError {
        let notice = Notice {
            id: self.next_notice_id,
            code: err.code(),
            message: err.user_message(),
        };
        self.next_notice_id += 1;
        warn!("Session notice {}: {}", notice.id, notice.code);
        self.notices.push(notice);
        err
    }

    /// Returns false when no notice has this id.
    pub fn dismiss(&mut self, notice_id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != notice_id);
        self.notices.len() != before
    }

    // ── lifecycle ───────────────────────────────────────────────────────────

    /// Tears the session down. Results of requests still in flight are ignored.
    pub fn close(&mut self) {
        if !self.closed {
            info!("Resume session closed");
        }
        self.closed = true;
    }

    // ── extraction ──────────────────────────────────────────────────────────

    /// Validates `raw_text` and issues a ticket that supersedes every earlier one.
    pub fn begin_extraction(
        &mut self,
        client: &ExtractorClient,
        raw_text: &str,
    ) -> Result<ExtractionTicket, PipelineError> {
        if let Err(e) = client.validate_input(raw_text) {
            return Err(self.raise(e));
        }
        self.latest_request += 1;
        debug!("Issued extraction request {}", self.latest_request);
        Ok(ExtractionTicket {
            request_id: self.latest_request,
            text: raw_text.to_string(),
        })
    }

    /// Applies an extraction result if `ticket` is still the latest request.
    ///
    /// A failed result raises a notice and leaves the current record untouched.
    pub fn complete_extraction(
        &mut self,
        ticket: ExtractionTicket,
        result: Result<Extraction, PipelineError>,
    ) -> ExtractionOutcome {
        if self.closed {
            debug!("Dropping extraction {} for closed session", ticket.request_id);
            return ExtractionOutcome::Closed;
        }
        if ticket.request_id != self.latest_request {
            debug!(
                "Dropping stale extraction {} (latest is {})",
                ticket.request_id, self.latest_request
            );
            return ExtractionOutcome::Stale;
        }

        match result {
            Ok(extraction) => {
                self.replace_record(extraction.record);
                info!("Applied extraction {}", ticket.request_id);
                ExtractionOutcome::Applied
            }
            Err(e) => {
                self.raise(e);
                ExtractionOutcome::Failed
            }
        }
    }

    /// `begin_extraction`, the network call, then `complete_extraction`.
    pub async fn extract_with(
        &mut self,
        client: &ExtractorClient,
        raw_text: &str,
    ) -> ExtractionOutcome {
        let ticket = match self.begin_extraction(client, raw_text) {
            Ok(ticket) => ticket,
            Err(_) => return ExtractionOutcome::Failed,
        };
        let result = client.extract(ticket.text()).await;
        self.complete_extraction(ticket, result)
    }

    // ── completeness ────────────────────────────────────────────────────────

    pub fn analyze(&self) -> CompletenessReport {
        completeness::analyze(&self.record)
    }

    /// Folds `answers` into the latest snapshot and returns the new report.
    pub fn merge(&mut self, answers: &PartialAnswers) -> CompletenessReport {
        if answers.is_empty() {
            return self.analyze();
        }
        let merged = completeness::merge(&self.record, answers);
        self.replace_record(merged);
        self.analyze()
    }

    /// Ends the completion step without answering; suggestions count as addressed.
    pub fn skip_completion(&mut self) {
        if self.record.suggestions.is_empty() {
            return;
        }
        let mut record = ResumeRecord::clone(&self.record);
        record.suggestions.clear();
        self.replace_record(record);
    }

    // ── direct edits ────────────────────────────────────────────────────────

    /// Runs `edit` on a copy of the record and swaps it in only if it succeeds.
    pub fn edit<T>(
        &mut self,
        edit: impl FnOnce(&mut ResumeRecord) -> Result<T, RecordError>,
    ) -> Result<T, PipelineError> {
        let mut draft = ResumeRecord::clone(&self.record);
        match edit(&mut draft) {
            Ok(value) => {
                self.replace_record(draft);
                Ok(value)
            }
            Err(e) => Err(self.raise(e.into())),
        }
    }

    pub fn set_personal_info(&mut self, info: PersonalInfo) {
        let mut record = ResumeRecord::clone(&self.record);
        record.personal_info = info;
        record.normalize();
        self.replace_record(record);
    }

    pub fn add_skill(&mut self, skill: &str) -> Result<(), PipelineError> {
        self.edit(|record| record.add_skill(skill))
    }

    pub fn remove_skill(&mut self, skill: &str) -> bool {
        self.edit(|record| Ok(record.remove_skill(skill)))
            .unwrap_or(false)
    }

    fn replace_record(&mut self, record: ResumeRecord) {
        self.record = Arc::new(record);
        if let Some(template) = self.template {
            self.rendered = Some(Arc::new(render(&self.record, template)));
        }
    }

    // ── rendering ───────────────────────────────────────────────────────────

    pub fn select_template(&mut self, template: TemplateId) -> &RenderedDocument {
        self.template = Some(template);
        let rendered = self
            .rendered
            .insert(Arc::new(render(&self.record, template)));
        info!("Selected template {template}");
        &**rendered
    }

    /// Selects by id string. An unknown id keeps the previous template and render.
    pub fn select_template_named(&mut self, template_id: &str) -> Result<TemplateId, PipelineError> {
        match template_id.parse::<TemplateId>() {
            Ok(template) => {
                self.select_template(template);
                Ok(template)
            }
            Err(e) => Err(self.raise(e)),
        }
    }

    /// Re-renders the latest snapshot. A template must have been selected.
    pub fn render(&mut self) -> Result<&RenderedDocument, PipelineError> {
        match self.template {
            Some(template) => Ok(self.select_template(template)),
            None => Err(self.raise(PipelineError::Validation(
                "Please choose a template first.".to_string(),
            ))),
        }
    }

    /// Whether the current render fits one page at the current export options.
    pub fn page_fill(&self) -> Option<PageFillAnalysis> {
        let config = self.export_options.page_config();
        self.rendered
            .as_deref()
            .map(|doc| analyze_page_fill(doc, &config))
    }

    // ── export ──────────────────────────────────────────────────────────────

    /// Exports the render currently shown and hands it to `sink`.
    ///
    /// Without a render this fails with `ExportError::NotRendered`. On any
    /// failure the record and render stay as they were, so the user can retry.
    pub async fn export(&mut self, sink: &dyn DownloadSink) -> Result<SavedExport, PipelineError> {
        let Some(doc) = self.rendered.clone() else {
            return Err(self.raise(ExportError::NotRendered.into()));
        };

        let exported = match export_to_pdf(&doc, &self.export_options).await {
            Ok(exported) => exported,
            Err(e) => return Err(self.raise(e)),
        };

        match sink.deliver(&exported).await {
            Ok(saved) => Ok(saved),
            Err(e) => Err(self.raise(e.into())),
        }
    }
}
