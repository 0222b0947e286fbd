use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::game_log::{parse_line, LogEntry};

const MAX_DEBUG_EVENTS: usize = 2_000;
const MAX_FAILURE_SAMPLES: usize = 20;
const UTF8_BOM: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum LogFileError {
    #[error("game log path is required")]
    MissingPath,

    #[error("game log file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read game log '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads the whole log into memory. Invalid UTF-8 is replaced rather than
/// rejected, the game occasionally writes truncated multi-byte names.
pub fn read_game_log(path: &Path) -> Result<String, LogFileError> {
    if path.as_os_str().is_empty() {
        return Err(LogFileError::MissingPath);
    }

    if !path.is_file() {
        return Err(LogFileError::NotFound(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| LogFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let text = String::from_utf8_lossy(&bytes);
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(&text);

    tracing::debug!(
        log_path = %path.display(),
        size_bytes = bytes.len(),
        "Read game log"
    );
    Ok(text.to_string())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedGameLogEntry {
    pub line_number: u64,
    #[serde(flatten)]
    pub entry: LogEntry,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFailure {
    pub line_number: u64,
    pub error: String,
    pub line: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseGameLogDebugResult {
    pub total_lines: u64,
    pub rejected_lines: u64,
    pub failed_lines: u64,
    pub parsed_events: Vec<ParsedGameLogEntry>,
    pub event_counts: BTreeMap<String, u64>,
    pub failures: Vec<LineFailure>,
    pub truncated: bool,
}

/// Parses every line and reports what came out, without rendering.
pub fn parse_game_log_text(raw_log: &str) -> ParseGameLogDebugResult {
    let mut result = ParseGameLogDebugResult::default();

    for line in raw_log.lines() {
        result.total_lines += 1;
        let line_number = result.total_lines;

        match parse_line(line) {
            Ok(Some(entry)) => {
                *result
                    .event_counts
                    .entry(entry.kind().to_string())
                    .or_insert(0) += 1;
                if result.parsed_events.len() < MAX_DEBUG_EVENTS {
                    result
                        .parsed_events
                        .push(ParsedGameLogEntry { line_number, entry });
                } else {
                    result.truncated = true;
                }
            }
            Ok(None) => result.rejected_lines += 1,
            Err(error) => {
                result.failed_lines += 1;
                if result.failures.len() < MAX_FAILURE_SAMPLES {
                    result.failures.push(LineFailure {
                        line_number,
                        error: error.to_string(),
                        line: line.to_string(),
                    });
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::{parse_game_log_text, read_game_log, LogFileError, MAX_DEBUG_EVENTS};
    use std::io::Write;

    fn build_hostility_line(index: usize) -> String {
        format!(
            "<2025-06-21T01:22:47.877Z> [Notice] <Debug Hostility Events> [OnHandleHit] Fake hit FROM Alpha TO Target{index}. Being sent to child Target{index} [Team_MissionFeatures][HitDetection]"
        )
    }

    #[test]
    fn counts_parsed_rejected_and_failed_lines() {
        let raw_log = [
            "<2025-06-21T01:22:40.000Z> Log started".to_string(),
            build_hostility_line(1),
            "<2025-06-21T01:22:48.000Z> [Notice] <Actor Death> CActor::Kill: 'Broken'".to_string(),
            String::new(),
            build_hostility_line(2),
        ]
        .join("\n");

        let result = parse_game_log_text(&raw_log);

        assert_eq!(result.total_lines, 5);
        assert_eq!(result.rejected_lines, 2);
        assert_eq!(result.failed_lines, 1);
        assert_eq!(result.failures[0].line_number, 3);
        assert_eq!(result.parsed_events.len(), 2);
        assert_eq!(result.parsed_events[1].line_number, 5);
        assert_eq!(result.event_counts.get("HostilityEvent").copied(), Some(2));
        assert!(!result.truncated);
    }

    #[test]
    fn caps_buffered_events_but_keeps_counting() {
        let total = MAX_DEBUG_EVENTS + 5;
        let raw_log = (0..total)
            .map(build_hostility_line)
            .collect::<Vec<String>>()
            .join("\n");

        let result = parse_game_log_text(&raw_log);

        assert_eq!(result.parsed_events.len(), MAX_DEBUG_EVENTS);
        assert_eq!(
            result.event_counts.get("HostilityEvent").copied(),
            Some(total as u64)
        );
        assert!(result.truncated);
    }

    #[test]
    fn serializes_entries_with_kind_tag() {
        let result = parse_game_log_text(&build_hostility_line(7));
        let json = serde_json::to_value(&result).unwrap();

        let event = &json["parsedEvents"][0];
        assert_eq!(event["lineNumber"], 1);
        assert_eq!(event["kind"], "hostilityEvent");
        assert_eq!(event["targetName"], "Target7");
        assert_eq!(event["timestamp"], "2025-06-21T01:22:47.877Z");
    }

    #[test]
    fn reads_log_and_strips_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("\u{feff}line one\r\nline two".as_bytes())
            .unwrap();

        let text = read_game_log(file.path()).unwrap();
        assert_eq!(text.lines().collect::<Vec<&str>>(), ["line one", "line two"]);
    }

    #[test]
    fn missing_log_is_reported() {
        let directory = tempfile::tempdir().unwrap();
        let missing = directory.path().join("Game.log");

        assert!(matches!(
            read_game_log(&missing),
            Err(LogFileError::NotFound(_))
        ));
    }
}
