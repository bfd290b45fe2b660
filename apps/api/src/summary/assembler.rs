//! Template resolution and prompt assembly.

use tracing::debug;

use crate::models::patient::PatientRecord;
use crate::summary::templates::{registry, TemplateId, PATIENT_DATA_PLACEHOLDER};

/// Maps a record to a template id from its primary diagnosis code.
///
/// Prefix rules, first match wins: `I2*` selects `cardiac`, `J*` selects
/// `respiratory`, anything else (including missing or empty diagnosis data)
/// selects `general`. Never fails.
///
/// Only those three templates are reachable by inference; `emergency`,
/// `surgical`, and `medication_focused` require explicit selection. That
/// asymmetry is inherited behavior and is preserved deliberately.
pub fn resolve_by_diagnosis(record: &PatientRecord) -> TemplateId {
    let code = record.primary_diagnosis_code();
    // I2x: ischemic heart disease range. J: respiratory chapter.
    if code.starts_with("I2") {
        TemplateId::Cardiac
    } else if code.starts_with('J') {
        TemplateId::Respiratory
    } else {
        TemplateId::General
    }
}

/// Builds the full prompt for a record.
///
/// An explicit template id wins outright; otherwise the id comes from
/// diagnosis resolution. The record is substituted, pretty-printed, into the
/// template's single placeholder; the returned string always contains the
/// whole chosen body with the placeholder fully replaced.
pub fn assemble(record: &PatientRecord, explicit: Option<TemplateId>) -> String {
    let template_id = explicit.unwrap_or_else(|| resolve_by_diagnosis(record));
    debug!(
        "Prepared prompt for patient {} using template: {}",
        record.patient_id_or_unknown(),
        template_id
    );
    fill(registry().get(template_id), record)
}

/// Same substitution against a caller-supplied body. The template editor's
/// preview path goes through here so edits never touch the shared registry.
pub fn assemble_with_body(record: &PatientRecord, body: &str) -> String {
    fill(body, record)
}

fn fill(body: &str, record: &PatientRecord) -> String {
    body.replace(PATIENT_DATA_PLACEHOLDER, &record.to_pretty_json())
}
