use crate::config::Config;
use crate::types::{Completion, FinishReason, Message};
use anyhow::{Context, anyhow};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
    finish_reason: Option<String>,
}

/// Non-streaming client for an Azure OpenAI chat deployment.
#[derive(Clone)]
pub struct LlmClient {
    url: String,
    api_key: String,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .timeout(config.request_timeout)
            .build()?;
        let url = format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            config.endpoint, config.deployment, config.api_version
        );
        Ok(Self {
            url,
            api_key: config.api_key.clone(),
            http,
        })
    }

    pub async fn complete(&self, messages: &[Message], tools: &Value) -> anyhow::Result<Completion> {
        let req = serde_json::json!({
            "messages": messages,
            "tools": tools,
        });
        debug!(messages = messages.len(), "sending chat completion request");

        let resp = self
            .http
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&req)
            .send()
            .await
            .context("Failed to send chat completion request")?;

        let status = resp.status();
        let response_text = resp.text().await?;
        if !status.is_success() {
            return Err(anyhow!("Chat completion failed ({}): {}", status, response_text));
        }

        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|e| anyhow!("Failed to parse JSON response: {}", e))?;
        if let Some(error) = response_json.get("error") {
            return Err(anyhow!("API error: {}", error));
        }

        let parsed: ChatResponse =
            serde_json::from_value(response_json).context("Unexpected chat completion shape")?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No choices in response"))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some(raw) => FinishReason::parse(raw),
            // some gateways omit the reason; infer it from the payload
            None if choice.message.tool_calls.as_ref().is_some_and(|c| !c.is_empty()) => {
                FinishReason::ToolCalls
            }
            None => FinishReason::Stop,
        };
        debug!(?finish_reason, "chat completion received");

        Ok(Completion {
            message: choice.message,
            finish_reason,
        })
    }
}
