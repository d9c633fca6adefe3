use crate::agent::LlmClientTrait;
use crate::types::{Completion, FinishReason, FunctionCall, Message, ToolCall};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Replays queued completions in order and records every transcript it was sent.
#[derive(Clone)]
pub struct MockLlmClient {
    responses: Arc<Mutex<Vec<Completion>>>,
    call_history: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn add_text_response(&mut self, content: &str) {
        self.responses.lock().unwrap().push(Completion {
            message: Message::assistant(content),
            finish_reason: FinishReason::Stop,
        });
    }

    /// Queues one assistant turn asking for `calls` as `(id, name, raw args)`.
    pub fn add_tool_calls_response(&mut self, calls: &[(&str, &str, &str)]) {
        let tool_calls = calls
            .iter()
            .map(|(id, name, args)| ToolCall {
                id: id.to_string(),
                call_type: "function".to_string(),
                function: FunctionCall {
                    name: name.to_string(),
                    arguments: args.to_string(),
                },
            })
            .collect();

        self.responses.lock().unwrap().push(Completion {
            message: Message::assistant_tool_calls(None, tool_calls),
            finish_reason: FinishReason::ToolCalls,
        });
    }

    pub fn add_tool_call_response(&mut self, tool_name: &str, args: &str) {
        self.add_tool_calls_response(&[("test-call-123", tool_name, args)]);
    }

    pub fn get_call_history(&self) -> Vec<Vec<Message>> {
        self.call_history.lock().unwrap().clone()
    }

    fn pop_response(&self) -> Option<Completion> {
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            None
        } else {
            Some(responses.remove(0))
        }
    }
}

#[async_trait]
impl LlmClientTrait for MockLlmClient {
    async fn complete(&self, messages: &[Message], _tools: &Value) -> Result<Completion> {
        // Store the call for verification
        self.call_history.lock().unwrap().push(messages.to_vec());

        self.pop_response()
            .ok_or_else(|| anyhow::anyhow!("No mock response available"))
    }
}
