//! Axum route handlers for the Summary and Template APIs.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::patient::{Demographics, PatientRecord};
use crate::state::AppState;
use crate::summary::assembler::{assemble, assemble_with_body};
use crate::summary::templates::{registry, TemplateId};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateSummaryRequest {
    /// The patient record, passed through opaquely.
    pub patient: Value,
    /// Explicit template id; omitted means diagnosis-based resolution.
    #[serde(default)]
    pub template: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateSummaryResponse {
    pub summary: String,
    pub template_id: TemplateId,
    pub patient_id: Option<String>,
    pub demographics: Demographics,
}

#[derive(Debug, Serialize)]
pub struct TemplateEntry {
    pub id: TemplateId,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct ListTemplatesResponse {
    pub templates: Vec<TemplateEntry>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub patient: Value,
    /// The editor's caller-local copy of the template body. The shared
    /// registry is never written, so concurrent editing sessions cannot
    /// observe each other's changes.
    #[serde(default)]
    pub body_override: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub template_id: TemplateId,
    pub prompt: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/summaries
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateSummaryRequest>,
) -> Result<Json<GenerateSummaryResponse>, AppError> {
    let template = request
        .template
        .as_deref()
        .map(str::parse::<TemplateId>)
        .transpose()?;
    let record = PatientRecord::new(request.patient);

    let generated = state.generator.generate(&record, template).await?;
    let demographics = record.demographics();

    Ok(Json(GenerateSummaryResponse {
        summary: generated.summary,
        template_id: generated.template_id,
        patient_id: generated.patient_id,
        demographics,
    }))
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<ListTemplatesResponse> {
    let reg = registry();
    let templates = reg
        .ids()
        .into_iter()
        .map(|id| TemplateEntry {
            id,
            body: reg.get(id).to_string(),
        })
        .collect();
    Json(ListTemplatesResponse { templates })
}

/// GET /api/v1/templates/:id
pub async fn handle_get_template(
    Path(name): Path<String>,
) -> Result<Json<TemplateEntry>, AppError> {
    let (id, body) = registry().lookup(&name)?;
    Ok(Json(TemplateEntry {
        id,
        body: body.to_string(),
    }))
}

/// POST /api/v1/templates/:id/preview
///
/// Renders the assembled prompt without calling the LLM. With `body_override`
/// set, the substitution runs against the caller's copy of the template.
pub async fn handle_preview_template(
    Path(name): Path<String>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let id: TemplateId = name.parse()?;
    let record = PatientRecord::new(request.patient);

    let prompt = match &request.body_override {
        Some(body) => assemble_with_body(&record, body),
        None => assemble(&record, Some(id)),
    };

    Ok(Json(PreviewResponse {
        template_id: id,
        prompt,
    }))
}
