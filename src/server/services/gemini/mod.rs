mod tools;
mod types;

pub use tools::{create_tool, ToolExecutor};
pub use types::*;

use anyhow::{anyhow, Result};
use reqwest::Client;
use serde_json::json;
use tracing::{info, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// How many request/tool-result rounds the model gets before we give up on
/// it ever producing a final answer.
const MAX_TOOL_ROUNDS: usize = 8;

/// Client for Gemini's OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct GeminiService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiService {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow!("GEMINI_API_KEY not found"))?;
        let base_url =
            std::env::var("GEMINI_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::with_base_url(api_key, base_url))
    }

    /// Single-shot chat without tools.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let message = self
            .complete(
                vec![ChatMessage::system(system), ChatMessage::user(user)],
                None,
            )
            .await?;
        Ok(message.content.unwrap_or_default())
    }

    /// Chat with declared data-fetch tools. Tool calls requested by the
    /// model are answered through `executor` until the model produces a
    /// final text answer; only that final text is returned.
    pub async fn chat_with_tools(
        &self,
        system: &str,
        user: &str,
        tools: Vec<Tool>,
        executor: &dyn ToolExecutor,
    ) -> Result<String> {
        if tools.is_empty() {
            return self.chat(system, user).await;
        }

        let mut messages = vec![ChatMessage::system(system), ChatMessage::user(user)];

        for _ in 0..MAX_TOOL_ROUNDS {
            let reply = self.complete(messages.clone(), Some(tools.clone())).await?;

            let tool_calls = match reply.tool_calls {
                Some(calls) if !calls.is_empty() => calls,
                _ => return Ok(reply.content.unwrap_or_default()),
            };

            messages.push(ChatMessage {
                role: "assistant".to_string(),
                content: reply.content.unwrap_or_default(),
                tool_call_id: None,
                tool_calls: Some(tool_calls.clone()),
            });

            for call in tool_calls {
                info!("executing model tool call: {}", call.function.name);
                let arguments: serde_json::Value =
                    serde_json::from_str(&call.function.arguments).unwrap_or_else(|err| {
                        warn!("malformed tool arguments from model: {err}");
                        json!({})
                    });
                let result = match executor.execute(&call.function.name, arguments).await {
                    Ok(value) => value,
                    Err(err) => {
                        warn!("tool {} failed: {err}", call.function.name);
                        json!({ "error": err.to_string() })
                    }
                };
                messages.push(ChatMessage::tool(call.id, result.to_string()));
            }
        }

        Err(anyhow!(
            "model did not produce a final answer within {MAX_TOOL_ROUNDS} tool rounds"
        ))
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResponseMessage> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            temperature: 0.7,
            tools,
            tool_choice: None,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await?;
            return Err(anyhow!(
                "API request failed with status {}: {}",
                status,
                text
            ));
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Err(anyhow!("Empty response from API"));
        }

        let chat_response: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            anyhow!("Failed to parse response: {}\nResponse text: {}", e, text)
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| anyhow!("No response from model"))
    }
}
