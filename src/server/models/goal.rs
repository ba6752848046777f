use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GoalSet {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub goals: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SetGoalsRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub goals: Vec<String>,
}

/// Older documents stored the goal list as a bare string, and a few as other
/// scalars. Applied once at the store boundary so internal code only ever
/// sees an ordered list of strings.
pub fn normalize_goals(stored: &Value) -> Vec<String> {
    match stored {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let text = match item {
                    Value::String(s) => s.trim().to_string(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (!text.is_empty()).then_some(text)
            })
            .collect(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}
