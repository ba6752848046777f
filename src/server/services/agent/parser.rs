//! Extraction of structured task references from raw model output. Parsing
//! never fails: anything unusable collapses to an empty candidate list.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// An unvalidated task reference produced by the model. Extra fields in the
/// model's output are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCandidate {
    pub id: String,
    pub title: String,
}

lazy_static! {
    static ref NUMBERED_LINE: Regex = Regex::new(r"^\s*(\d+)[.)]\s+(.+)$").unwrap();
    static ref NUMBER_DELIMITER: Regex = Regex::new(r"\d+[.)]\s+").unwrap();
}

/// Parses a JSON array of `{id, title}` objects out of `raw`. Tolerates
/// markdown code fences and prose before/after the array. Known limitation:
/// when the output contains more than one array, the first-`[`-to-last-`]`
/// span merges them and extraction usually fails to an empty list.
pub fn parse_json_tasks(raw: &str) -> Vec<TaskCandidate> {
    let cleaned = strip_code_fences(raw.trim());
    let cleaned = cleaned.trim();
    let payload = extract_array_span(cleaned).unwrap_or(cleaned);

    match serde_json::from_str::<Vec<TaskCandidate>>(payload) {
        Ok(tasks) => tasks,
        Err(err) => {
            warn!("model output is not a parseable task array: {err}");
            Vec::new()
        }
    }
}

/// A response is treated as list-shaped only when at least 3 lines lead
/// with a digit; anything else is conversational text.
pub fn looks_like_numbered_list(raw: &str) -> bool {
    raw.lines()
        .filter(|line| {
            line.trim_start()
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        })
        .count()
        >= 3
}

/// Fallback for prose task lists ("1. Learn Python"). Ids are synthetic
/// (`suggested_task_<n>`) and only meaningful if reconciled downstream.
pub fn parse_numbered_list(raw: &str) -> Vec<TaskCandidate> {
    let mut tasks: Vec<TaskCandidate> = raw
        .lines()
        .filter_map(|line| {
            NUMBERED_LINE.captures(line).map(|caps| TaskCandidate {
                id: format!("suggested_task_{}", &caps[1]),
                title: caps[2].trim().to_string(),
            })
        })
        .collect();

    if tasks.is_empty() {
        tasks = NUMBER_DELIMITER
            .split(raw)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .enumerate()
            .map(|(i, title)| TaskCandidate {
                id: format!("suggested_task_{}", i + 1),
                title: title.to_string(),
            })
            .collect();
    }

    tasks
}

/// JSON extraction first; numbered-list fallback only when the text is
/// list-shaped.
pub fn parse_model_tasks(raw: &str) -> Vec<TaskCandidate> {
    let tasks = parse_json_tasks(raw);
    if !tasks.is_empty() {
        return tasks;
    }
    if looks_like_numbered_list(raw) {
        return parse_numbered_list(raw);
    }
    Vec::new()
}

fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "")
}

fn extract_array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}
