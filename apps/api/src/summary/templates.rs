//! Prompt templates for discharge summary generation.
//!
//! Every specialized body is the base body plus one appended specialization
//! block. The base structure (section list, length guidance, terminology
//! register, single `{patient_data}` placeholder) is present verbatim in all
//! six templates; specialization only appends, never removes or reorders.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The single substitution point every template body carries.
pub const PATIENT_DATA_PLACEHOLDER: &str = "{patient_data}";

/// Shared base template: structural requirements for every summary.
pub const BASE_TEMPLATE: &str = r#"
You are an experienced medical professional tasked with creating a discharge summary letter for a patient.
Use ONLY the patient data provided to generate a clinically accurate, professional, and concise discharge summary.
Do NOT include any information that isn't explicitly in the provided data.
If critical information is missing, indicate this clearly rather than making assumptions.

Follow these precise format requirements:
1. Use a professional letterhead format
2. Include a clear structure with sections for:
   - Patient Demographics
   - Diagnosis
   - Hospital Course
   - Treatment Provided
   - Discharge Medications
   - Follow-up Instructions
3. Keep the overall summary concise but comprehensive (300-500 words)
4. Use professional medical terminology appropriate for physician-to-physician communication
5. Sign off with the attending physician's name if provided in the data

Patient Data:
{patient_data}
"#;

const CARDIAC_BLOCK: &str = r#"
For this cardiac patient:
- Be precise about cardiac diagnostic markers (troponin levels, EKG findings)
- Clearly document any cardiac procedures performed (PCI, stenting)
- Detail specific discharge medications including cardiac-specific drugs (anticoagulants, antiplatelets, beta-blockers)
- Include specific cardiac monitoring instructions in follow-up care
"#;

const RESPIRATORY_BLOCK: &str = r#"
For this respiratory patient:
- Document oxygen saturation levels and respiratory rates
- Note any respiratory support provided (oxygen therapy, ventilation)
- Include pulmonary function metrics if available
- Specify respiratory follow-up care (breathing exercises, oxygen requirements)
"#;

const EMERGENCY_BLOCK: &str = r#"
For this emergency/critical care patient:
- Highlight critical values from initial presentation
- Document stabilization procedures in chronological order
- Note any ICU/critical care interventions
- Emphasize immediate follow-up requirements and warning signs to monitor
"#;

const SURGICAL_BLOCK: &str = r#"
For this surgical patient:
- Describe the surgical procedure performed in clinical terms
- Document post-operative course and complications if any
- Detail wound care instructions
- Specify activity restrictions and physical therapy requirements
"#;

const MEDICATION_FOCUSED_BLOCK: &str = r#"
When detailing discharge medications:
- List each medication with full dosing information (name, dose, frequency, duration)
- Indicate which medications are new versus continuing
- Note any dose adjustments from admission medications
- Include specific administration instructions
- Document any medications that were discontinued during hospitalization
"#;

/// Identifier for one of the six fixed prompt templates.
///
/// The set is closed: parsing any other string fails with `UnknownTemplate`,
/// so a typed `TemplateId` always has a body in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateId {
    General,
    Cardiac,
    Respiratory,
    Emergency,
    Surgical,
    MedicationFocused,
}

impl TemplateId {
    /// All recognized ids, in the stable order UI pickers enumerate them.
    pub const ALL: [TemplateId; 6] = [
        TemplateId::General,
        TemplateId::Cardiac,
        TemplateId::Respiratory,
        TemplateId::Emergency,
        TemplateId::Surgical,
        TemplateId::MedicationFocused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::General => "general",
            TemplateId::Cardiac => "cardiac",
            TemplateId::Respiratory => "respiratory",
            TemplateId::Emergency => "emergency",
            TemplateId::Surgical => "surgical",
            TemplateId::MedicationFocused => "medication_focused",
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general" => Ok(TemplateId::General),
            "cardiac" => Ok(TemplateId::Cardiac),
            "respiratory" => Ok(TemplateId::Respiratory),
            "emergency" => Ok(TemplateId::Emergency),
            "surgical" => Ok(TemplateId::Surgical),
            "medication_focused" => Ok(TemplateId::MedicationFocused),
            other => Err(AppError::UnknownTemplate(other.to_string())),
        }
    }
}

/// The fixed `TemplateId -> body` mapping.
///
/// Read-only after construction. The process-wide instance behind
/// `registry()` is never handed out mutably, so template edits made through
/// the editor UI stay caller-local (see the preview endpoint).
pub struct TemplateRegistry {
    // Indexed by TemplateId discriminant; same order as TemplateId::ALL.
    bodies: [String; 6],
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            bodies: [
                BASE_TEMPLATE.to_string(),
                specialize(CARDIAC_BLOCK),
                specialize(RESPIRATORY_BLOCK),
                specialize(EMERGENCY_BLOCK),
                specialize(SURGICAL_BLOCK),
                specialize(MEDICATION_FOCUSED_BLOCK),
            ],
        }
    }

    pub fn get(&self, id: TemplateId) -> &str {
        &self.bodies[id as usize]
    }

    /// String-keyed lookup for boundary callers. Fails with `UnknownTemplate`
    /// for anything outside the six recognized ids.
    pub fn lookup(&self, name: &str) -> Result<(TemplateId, &str), AppError> {
        let id = name.parse::<TemplateId>()?;
        Ok((id, self.get(id)))
    }

    pub fn ids(&self) -> [TemplateId; 6] {
        TemplateId::ALL
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn specialize(block: &str) -> String {
    format!("{BASE_TEMPLATE}\n{block}")
}

static REGISTRY: LazyLock<TemplateRegistry> = LazyLock::new(TemplateRegistry::new);

/// Process-wide read-only registry, initialized once on first use.
pub fn registry() -> &'static TemplateRegistry {
    &REGISTRY
}
