//! Patient record model: an opaque JSON document with typed accessors for the
//! few fields the pipeline actually inspects.
//!
//! No field is required. The record passes through to the prompt untouched;
//! only `patient_id` (log correlation) and `diagnoses` (template resolution)
//! are ever read, and both degrade to explicit defaults when absent.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

/// One patient admission, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientRecord(Value);

impl PatientRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Loads a record from a JSON file, attaching the path to any failure.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path).map_err(|e| AppError::MalformedInput {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let value = serde_json::from_str(&raw).map_err(|e| AppError::MalformedInput {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(value))
    }

    /// Patient identifier. Used for log correlation only, never validated.
    pub fn patient_id(&self) -> Option<&str> {
        self.0.get("patient_id").and_then(Value::as_str)
    }

    /// `patient_id` or `"unknown"`, the form used in log lines.
    pub fn patient_id_or_unknown(&self) -> &str {
        self.patient_id().unwrap_or("unknown")
    }

    /// Primary diagnosis code: the first entry of `diagnoses`. Missing array,
    /// empty array, or an entry without a code all yield the empty string.
    pub fn primary_diagnosis_code(&self) -> &str {
        self.0
            .get("diagnoses")
            .and_then(Value::as_array)
            .and_then(|diagnoses| diagnoses.first())
            .and_then(|entry| entry.get("diagnosis_code"))
            .and_then(Value::as_str)
            .unwrap_or("")
    }

    /// Key demographics with `"Unknown"` standing in for absent fields.
    /// The discharge date falls back to `expected_discharge_date`.
    pub fn demographics(&self) -> Demographics {
        let demo = self.0.get("patient_demographics");
        let get = |key: &str| field_string(demo, key).unwrap_or_else(|| "Unknown".to_string());
        Demographics {
            name: get("name"),
            age: get("age"),
            gender: get("gender"),
            admission_date: get("admission_date"),
            discharge_date: field_string(demo, "discharge_date")
                .or_else(|| field_string(demo, "expected_discharge_date"))
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }

    /// Pretty-printed JSON for prompt substitution. Lossless: every key and
    /// value of the document survives the round trip.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| self.0.to_string())
    }
}

/// Demographics summary shown alongside a generated summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Demographics {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub admission_date: String,
    pub discharge_date: String,
}

fn field_string(obj: Option<&Value>, key: &str) -> Option<String> {
    match obj?.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_patient_id_present() {
        let record = PatientRecord::new(json!({"patient_id": "p1"}));
        assert_eq!(record.patient_id(), Some("p1"));
        assert_eq!(record.patient_id_or_unknown(), "p1");
    }

    #[test]
    fn test_patient_id_missing_is_unknown() {
        let record = PatientRecord::new(json!({}));
        assert_eq!(record.patient_id(), None);
        assert_eq!(record.patient_id_or_unknown(), "unknown");
    }

    #[test]
    fn test_primary_diagnosis_code_first_entry() {
        let record = PatientRecord::new(json!({
            "diagnoses": [
                {"diagnosis_code": "I21.9", "description": "Acute MI"},
                {"diagnosis_code": "J18.9"}
            ]
        }));
        assert_eq!(record.primary_diagnosis_code(), "I21.9");
    }

    #[test]
    fn test_primary_diagnosis_code_defaults_to_empty() {
        assert_eq!(PatientRecord::new(json!({})).primary_diagnosis_code(), "");
        assert_eq!(
            PatientRecord::new(json!({"diagnoses": []})).primary_diagnosis_code(),
            ""
        );
        assert_eq!(
            PatientRecord::new(json!({"diagnoses": [{"description": "no code"}]}))
                .primary_diagnosis_code(),
            ""
        );
        // malformed shapes degrade too, never error
        assert_eq!(
            PatientRecord::new(json!({"diagnoses": "not-an-array"})).primary_diagnosis_code(),
            ""
        );
    }

    #[test]
    fn test_demographics_defaults_to_unknown() {
        let demo = PatientRecord::new(json!({})).demographics();
        assert_eq!(demo.name, "Unknown");
        assert_eq!(demo.age, "Unknown");
        assert_eq!(demo.gender, "Unknown");
        assert_eq!(demo.admission_date, "Unknown");
        assert_eq!(demo.discharge_date, "Unknown");
    }

    #[test]
    fn test_demographics_discharge_date_fallback() {
        let demo = PatientRecord::new(json!({
            "patient_demographics": {
                "name": "Jane Doe",
                "age": 67,
                "expected_discharge_date": "2025-04-15"
            }
        }))
        .demographics();
        assert_eq!(demo.name, "Jane Doe");
        assert_eq!(demo.age, "67");
        assert_eq!(demo.discharge_date, "2025-04-15");
    }

    #[test]
    fn test_to_pretty_json_round_trips() {
        let value = json!({
            "patient_id": "p1",
            "diagnoses": [{"diagnosis_code": "J18.9"}]
        });
        let record = PatientRecord::new(value.clone());
        let reparsed: Value = serde_json::from_str(&record.to_pretty_json()).unwrap();
        assert_eq!(reparsed, value);
    }

    #[test]
    fn test_from_file_missing_path_reports_malformed_input() {
        let err = PatientRecord::from_file(Path::new("/nonexistent/patient.json")).unwrap_err();
        match err {
            AppError::MalformedInput { path, .. } => {
                assert!(path.contains("nonexistent"));
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_from_file_invalid_json_reports_malformed_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patient.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = PatientRecord::from_file(&path).unwrap_err();
        assert!(matches!(err, AppError::MalformedInput { .. }));
    }

    #[test]
    fn test_from_file_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patient.json");
        std::fs::write(&path, r#"{"patient_id": "p42"}"#).unwrap();
        let record = PatientRecord::from_file(&path).unwrap();
        assert_eq!(record.patient_id(), Some("p42"));
    }
}
