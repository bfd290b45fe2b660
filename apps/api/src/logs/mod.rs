//! Application logging and the log-review contract.
//!
//! Log lines are written as `YYYY-MM-DD HH:MM:SS | LEVEL | MESSAGE`, one file
//! per day (`discharge_summary_YYYYMMDD.log`) under the configured logs dir.
//! The line format is a contract: the log viewer and export tooling parse it,
//! so the writer (`PipeFormat`) and the parser (`parse_log_line`) must stay
//! in lockstep.

pub mod handlers;

use std::fmt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Timestamp format shared by the writer and the parser.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FIELD_SEPARATOR: &str = " | ";

/// Event formatter producing the pipe-separated contract format.
pub struct PipeFormat;

impl<S, N> FormatEvent<S, N> for PipeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}",
            Local::now().format(TIMESTAMP_FORMAT),
            event.metadata().level(),
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Initializes structured logging: a human-readable stdout layer plus the
/// daily contract-format file layer. Call once at startup.
pub fn setup_logging(logs_dir: &Path, level: &str) -> Result<()> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))?;

    let file = open_daily_log(logs_dir)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(PipeFormat)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

/// Opens (appending) today's log file, `discharge_summary_YYYYMMDD.log`.
fn open_daily_log(logs_dir: &Path) -> Result<File> {
    let path = logs_dir.join(format!(
        "discharge_summary_{}.log",
        Local::now().format("%Y%m%d")
    ));
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// One parsed log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

impl LogEntry {
    /// Date component of the timestamp, when well-formed.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

/// Parses one contract-format line. Lines that do not match (continuation
/// lines, partial writes) yield `None` and are skipped by callers.
pub fn parse_log_line(line: &str) -> Option<LogEntry> {
    let mut parts = line.splitn(3, FIELD_SEPARATOR);
    let timestamp = parts.next()?.trim();
    let level = parts.next()?.trim();
    let message = parts.next()?;
    if timestamp.is_empty() || level.is_empty() {
        return None;
    }
    Some(LogEntry {
        timestamp: timestamp.to_string(),
        level: level.to_string(),
        message: message.trim_end().to_string(),
    })
}

/// Filter criteria for log review. Empty criteria match everything.
#[derive(Debug, Default, Clone)]
pub struct LogFilter {
    pub level: Option<String>,
    pub search: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(level) = &self.level {
            if !entry.level.eq_ignore_ascii_case(level) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            if !entry
                .message
                .to_lowercase()
                .contains(&search.to_lowercase())
            {
                return false;
            }
        }
        if self.from.is_some() || self.to.is_some() {
            // entries with unparseable timestamps cannot satisfy a date range
            let Some(date) = entry.date() else {
                return false;
            };
            if self.from.is_some_and(|from| date < from) {
                return false;
            }
            if self.to.is_some_and(|to| date > to) {
                return false;
            }
        }
        true
    }
}

/// Reads and parses one log file, keeping only matching entries.
pub fn read_entries(path: &Path, filter: &LogFilter) -> Result<Vec<LogEntry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read log file {}", path.display()))?;
    Ok(raw
        .lines()
        .filter_map(parse_log_line)
        .filter(|entry| filter.matches(entry))
        .collect())
}

/// First `max_chars` characters of `text`, with a marker when truncated.
/// Used for audit-log excerpts so full prompts, responses, and chat messages
/// never reach the log.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Log files in the directory, newest first by modification time.
pub fn list_log_files(logs_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(logs_dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "log"))
        .collect();
    files.sort_by_key(|path| {
        std::cmp::Reverse(std::fs::metadata(path).and_then(|m| m.modified()).ok())
    });
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_format_output_parses_back() {
        // writer and parser must stay in lockstep: emit a real event through
        // PipeFormat, then parse the emitted line with parse_log_line
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.log");
        let file = File::create(&path).unwrap();

        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .event_format(PipeFormat)
                .with_writer(Mutex::new(file)),
        );
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Generated summary for patient: p1");
        });

        let raw = std::fs::read_to_string(&path).unwrap();
        let entry = parse_log_line(raw.lines().next().unwrap()).unwrap();
        assert_eq!(entry.level, "INFO");
        assert_eq!(entry.message, "Generated summary for patient: p1");
        assert!(entry.date().is_some(), "timestamp must carry a parseable date");
    }

    #[test]
    fn test_parse_log_line_contract_format() {
        let entry = parse_log_line("2025-04-12 15:31:57 | INFO | Starting web UI").unwrap();
        assert_eq!(entry.timestamp, "2025-04-12 15:31:57");
        assert_eq!(entry.level, "INFO");
        assert_eq!(entry.message, "Starting web UI");
    }

    #[test]
    fn test_parse_log_line_message_may_contain_separator() {
        let entry =
            parse_log_line("2025-04-12 15:31:57 | ERROR | failed: a | b | c").unwrap();
        assert_eq!(entry.message, "failed: a | b | c");
    }

    #[test]
    fn test_parse_log_line_rejects_non_matching_lines() {
        assert_eq!(parse_log_line(""), None);
        assert_eq!(parse_log_line("continuation of a stack trace"), None);
        assert_eq!(parse_log_line("2025-04-12 15:31:57 | INFO"), None);
    }

    #[test]
    fn test_entry_date_extraction() {
        let entry = parse_log_line("2025-04-12 15:31:57 | INFO | msg").unwrap();
        assert_eq!(
            entry.date(),
            NaiveDate::from_ymd_opt(2025, 4, 12)
        );
        let bad = LogEntry {
            timestamp: "not a date".to_string(),
            level: "INFO".to_string(),
            message: "msg".to_string(),
        };
        assert_eq!(bad.date(), None);
    }

    #[test]
    fn test_filter_by_level_is_case_insensitive() {
        let entry = parse_log_line("2025-04-12 15:31:57 | WARN | low disk").unwrap();
        let filter = LogFilter {
            level: Some("warn".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&entry));
        let other = LogFilter {
            level: Some("ERROR".to_string()),
            ..Default::default()
        };
        assert!(!other.matches(&entry));
    }

    #[test]
    fn test_filter_by_search_term() {
        let entry =
            parse_log_line("2025-04-12 15:31:57 | INFO | Generated summary for patient: p1")
                .unwrap();
        let hit = LogFilter {
            search: Some("PATIENT".to_string()),
            ..Default::default()
        };
        assert!(hit.matches(&entry));
        let miss = LogFilter {
            search: Some("redis".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&entry));
    }

    #[test]
    fn test_filter_by_date_range() {
        let entry = parse_log_line("2025-04-12 15:31:57 | INFO | msg").unwrap();
        let inside = LogFilter {
            from: NaiveDate::from_ymd_opt(2025, 4, 1),
            to: NaiveDate::from_ymd_opt(2025, 4, 30),
            ..Default::default()
        };
        assert!(inside.matches(&entry));
        let before = LogFilter {
            from: NaiveDate::from_ymd_opt(2025, 4, 13),
            ..Default::default()
        };
        assert!(!before.matches(&entry));
    }

    #[test]
    fn test_read_entries_applies_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discharge_summary_20250412.log");
        std::fs::write(
            &path,
            "2025-04-12 10:00:00 | INFO | started\n\
             2025-04-12 10:00:01 | ERROR | completion failed\n\
             garbage line\n\
             2025-04-12 10:00:02 | INFO | finished\n",
        )
        .unwrap();

        let all = read_entries(&path, &LogFilter::default()).unwrap();
        assert_eq!(all.len(), 3);

        let errors = read_entries(
            &path,
            &LogFilter {
                level: Some("ERROR".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "completion failed");
    }

    #[test]
    fn test_list_log_files_only_logs_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let older = dir.path().join("discharge_summary_20250411.log");
        let newer = dir.path().join("discharge_summary_20250412.log");
        std::fs::write(&older, "").unwrap();
        std::fs::write(&newer, "").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let mtime = std::fs::metadata(&older).unwrap().modified().unwrap();
        let file = OpenOptions::new().write(true).open(&newer).unwrap();
        file.set_modified(mtime + std::time::Duration::from_secs(60))
            .unwrap();

        let files = list_log_files(dir.path());
        assert_eq!(files, vec![newer, older]);
    }

    #[test]
    fn test_list_log_files_missing_dir_is_empty() {
        assert!(list_log_files(Path::new("/nonexistent/logs")).is_empty());
    }

    #[test]
    fn test_excerpt_bounds_long_text() {
        assert_eq!(excerpt("short", 100), "short");
        let cut = excerpt(&"x".repeat(500), 100);
        assert_eq!(cut.len(), 103);
        assert!(cut.ends_with("..."));
    }
}
