use async_trait::async_trait;

use super::types::{FunctionDefinition, Tool};

pub fn create_tool(
    name: impl Into<String>,
    description: Option<String>,
    parameters: serde_json::Value,
) -> Tool {
    Tool {
        tool_type: "function".to_string(),
        function: FunctionDefinition {
            name: name.into(),
            description,
            parameters,
        },
    }
}

/// Executes the data-fetch functions the model is allowed to call. The
/// model decides which functions to call and in what order; this side only
/// answers them.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> anyhow::Result<serde_json::Value>;
}
