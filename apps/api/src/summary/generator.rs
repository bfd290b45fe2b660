//! Discharge summary generation: orchestrates the full pipeline.
//!
//! Flow: load record -> resolve template -> assemble prompt -> LLM call ->
//! sanitize -> audit log. Stateless across calls; safe to share behind an
//! `Arc` and invoke concurrently.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::logs::excerpt;
use crate::models::patient::PatientRecord;
use crate::summary::assembler::{assemble, resolve_by_diagnosis};
use crate::summary::sanitize::OutputSanitizer;
use crate::summary::templates::TemplateId;

/// System message for every summary completion call.
pub const SUMMARY_SYSTEM: &str =
    "You are a medical professional creating discharge summaries.";

/// Longest prompt/response slice the audit log may carry. Full patient data
/// never reaches the log; excerpts appear at debug verbosity only.
const AUDIT_EXCERPT_LEN: usize = 100;

/// A generated summary plus the resolution outcome, for callers that display
/// which template was used.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedSummary {
    pub summary: String,
    pub template_id: TemplateId,
    pub patient_id: Option<String>,
}

pub struct SummaryGenerator {
    llm: LlmClient,
    sanitizer: Arc<dyn OutputSanitizer>,
}

impl SummaryGenerator {
    pub fn new(llm: LlmClient, sanitizer: Arc<dyn OutputSanitizer>) -> Self {
        info!("Initialized SummaryGenerator with model: {}", llm.model());
        Self { llm, sanitizer }
    }

    /// Generates a discharge summary for one record. An explicit template id
    /// wins; otherwise the template comes from diagnosis resolution.
    pub async fn generate(
        &self,
        record: &PatientRecord,
        template: Option<TemplateId>,
    ) -> Result<GeneratedSummary, AppError> {
        let template_id = template.unwrap_or_else(|| resolve_by_diagnosis(record));
        let prompt = assemble(record, Some(template_id));
        let patient_id = record.patient_id_or_unknown();

        info!("Generating discharge summary for patient: {patient_id}");
        let raw = self.llm.complete_prompt(SUMMARY_SYSTEM, &prompt).await?;
        let summary = self.sanitizer.sanitize(&raw);

        info!("Generated summary for patient: {patient_id}");
        debug!(
            "prompt_length={} response_length={} prompt_excerpt={:?} response_excerpt={:?}",
            prompt.len(),
            summary.len(),
            excerpt(&prompt, AUDIT_EXCERPT_LEN),
            excerpt(&summary, AUDIT_EXCERPT_LEN)
        );

        Ok(GeneratedSummary {
            summary,
            template_id,
            patient_id: record.patient_id().map(str::to_string),
        })
    }

    /// Generates a summary from a patient data file.
    pub async fn generate_from_file(
        &self,
        path: &Path,
        template: Option<TemplateId>,
    ) -> Result<GeneratedSummary, AppError> {
        let record = PatientRecord::from_file(path)?;
        self.generate(&record, template).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_excerpt_is_bounded() {
        let long = "x".repeat(500);
        let cut = excerpt(&long, AUDIT_EXCERPT_LEN);
        assert_eq!(cut.len(), AUDIT_EXCERPT_LEN + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_generated_summary_serializes_template_id() {
        let generated = GeneratedSummary {
            summary: "text".to_string(),
            template_id: TemplateId::Cardiac,
            patient_id: Some("p1".to_string()),
        };
        let value = serde_json::to_value(&generated).unwrap();
        assert_eq!(value["template_id"], "cardiac");
        assert_eq!(value["patient_id"], "p1");
    }
}
