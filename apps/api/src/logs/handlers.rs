//! Axum route handlers for the log review API.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::logs::{list_log_files, read_entries, LogEntry, LogFilter};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LogFileEntry {
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct ListLogsResponse {
    pub files: Vec<LogFileEntry>,
}

/// GET /api/v1/logs
pub async fn handle_list_logs(State(state): State<AppState>) -> Json<ListLogsResponse> {
    let files = list_log_files(&state.config.logs_dir)
        .into_iter()
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?.to_string();
            let size_bytes = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            Some(LogFileEntry { name, size_bytes })
        })
        .collect();
    Json(ListLogsResponse { files })
}

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub level: Option<String>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct LogDetailResponse {
    pub file: String,
    pub entries: Vec<LogEntry>,
}

/// GET /api/v1/logs/:name
///
/// `name` must be a bare file name inside the logs dir; anything path-like is
/// rejected before touching the filesystem.
pub async fn handle_get_log(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<LogQuery>,
) -> Result<Json<LogDetailResponse>, AppError> {
    validate_file_name(&name)?;

    let path = state.config.logs_dir.join(&name);
    if !path.is_file() {
        return Err(AppError::Validation(format!("No such log file: {name}")));
    }

    let filter = LogFilter {
        level: query.level,
        search: query.search,
        from: query.from,
        to: query.to,
    };
    let entries = read_entries(&path, &filter).map_err(AppError::Internal)?;

    Ok(Json(LogDetailResponse { file: name, entries }))
}

/// The name must stay inside the logs dir: no separators, no parent refs.
fn validate_file_name(name: &str) -> Result<(), AppError> {
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(AppError::Validation(format!("Invalid log file name: {name}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_file_name_accepts_bare_names() {
        assert!(validate_file_name("discharge_summary_20250412.log").is_ok());
    }

    #[test]
    fn test_validate_file_name_rejects_path_traversal() {
        for name in [
            "../etc/passwd",
            "..",
            "subdir/file.log",
            "/etc/passwd",
            "..\\windows\\system.log",
            "a\\b.log",
        ] {
            assert!(
                matches!(validate_file_name(name), Err(AppError::Validation(_))),
                "{name:?} must be rejected"
            );
        }
    }
}
