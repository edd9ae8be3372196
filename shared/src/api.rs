use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{MAX_NAME_CHARS, UNTITLED_SCHEDULE_NAME};

// ============================================================================
// Schedule API Types
// ============================================================================

/// Body of `POST /schedules`, url-encoded or JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleForm {
    #[serde(default)]
    pub schedule_name: String,

    #[serde(default)]
    #[validate(length(max = 5000))]
    pub memo: String,

    #[serde(default)]
    #[validate(length(max = 20000))]
    pub candidates: String,
}

impl CreateScheduleForm {
    /// Schedule name as it will be stored: trimmed, truncated, never empty.
    pub fn display_name(&self) -> String {
        let trimmed = self.schedule_name.trim();
        if trimmed.is_empty() {
            UNTITLED_SCHEDULE_NAME.to_string()
        } else {
            truncate_chars(trimmed, MAX_NAME_CHARS)
        }
    }

    /// Candidate labels, one per non-empty line, in submission order.
    pub fn candidate_names(&self) -> Vec<String> {
        parse_candidate_lines(&self.candidates)
    }
}

/// Split newline-delimited candidate text into labels.
///
/// Accepts `\r\n`, `\n` and bare `\r` separators; blank lines are dropped.
pub fn parse_candidate_lines(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| truncate_chars(line, MAX_NAME_CHARS))
        .collect()
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

// ============================================================================
// Availability API Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub availability: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateAvailabilityResponse {
    pub status: String,
    pub availability: i32,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, candidates: &str) -> CreateScheduleForm {
        CreateScheduleForm {
            schedule_name: name.to_string(),
            memo: String::new(),
            candidates: candidates.to_string(),
        }
    }

    #[test]
    fn candidates_split_on_crlf_and_keep_order() {
        let names = parse_candidate_lines("テスト候補日1\r\nテスト候補日2\r\nテスト候補日3");
        assert_eq!(names, vec!["テスト候補日1", "テスト候補日2", "テスト候補日3"]);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let names = parse_candidate_lines("\n  a \n\r\n\n b\r\r");
        assert_eq!(names, vec!["a", "b"]);
        assert!(parse_candidate_lines("").is_empty());
        assert!(parse_candidate_lines("\r\n  \r\n").is_empty());
    }

    #[test]
    fn empty_name_falls_back_to_placeholder() {
        assert_eq!(form("", "").display_name(), UNTITLED_SCHEDULE_NAME);
        assert_eq!(form("   ", "").display_name(), UNTITLED_SCHEDULE_NAME);
        assert_eq!(form(" 飲み会 ", "").display_name(), "飲み会");
    }

    #[test]
    fn long_names_are_truncated_by_characters() {
        let long = "あ".repeat(MAX_NAME_CHARS + 10);
        assert_eq!(
            form(&long, "").display_name().chars().count(),
            MAX_NAME_CHARS
        );
        assert_eq!(
            form("x", &long).candidate_names()[0].chars().count(),
            MAX_NAME_CHARS
        );
    }

    #[test]
    fn form_fields_use_camel_case() {
        let parsed: CreateScheduleForm = serde_json::from_str(
            r#"{"scheduleName":"n","memo":"m","candidates":"c"}"#,
        )
        .expect("should parse form");
        assert_eq!(parsed.schedule_name, "n");
        assert_eq!(parsed.memo, "m");
        assert_eq!(parsed.candidates, "c");
    }

    #[test]
    fn oversized_memo_fails_validation() {
        let mut oversized = form("n", "c");
        oversized.memo = "m".repeat(5001);
        assert!(oversized.validate().is_err());
        assert!(form("n", "c").validate().is_ok());
    }
}
