use crate::llm_client::LlmClient;
use crate::session::Session;
use crate::tool_registry::ToolRegistry;
use crate::tools::DataResolver;
use crate::types::{Completion, Message};
use crate::utils::clip;
use anyhow::{Context, bail};
use async_trait::async_trait;
use serde_json::Value;
use std::io;
use tracing::debug;

/// How many characters of a tool result make it into the debug log.
const LOG_CLIP: usize = 200;

pub trait AgentEventHandler {
    /// Called before each requested tool runs, with the raw argument payload.
    fn on_tool_call(&mut self, name: &str, args: &str) -> io::Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClientTrait: Send + Sync {
    async fn complete(&self, messages: &[Message], tools: &Value) -> anyhow::Result<Completion>;
}

// Implement trait for real LlmClient
#[async_trait]
impl LlmClientTrait for LlmClient {
    async fn complete(&self, messages: &[Message], tools: &Value) -> anyhow::Result<Completion> {
        self.complete(messages, tools).await
    }
}

pub struct Agent {
    llm: Box<dyn LlmClientTrait>,
    tools: ToolRegistry,
    resolver: DataResolver,
}

impl Agent {
    pub fn new(llm: Box<dyn LlmClientTrait>, tools: ToolRegistry, resolver: DataResolver) -> Self {
        Self {
            llm,
            tools,
            resolver,
        }
    }

    /// Answers one user request.
    ///
    /// Appends the user message, then keeps sending the transcript to the
    /// model while it asks for tools. Every round records the assistant's
    /// tool-call message followed by one tool result per call, in the order
    /// the calls were returned. The final answer is returned for rendering
    /// and is not added to the transcript.
    ///
    /// Remote failures and unknown tool names abort the request with an error.
    pub async fn respond(
        &self,
        session: &mut Session,
        input: &str,
        handler: &mut dyn AgentEventHandler,
    ) -> anyhow::Result<Completion> {
        session.append(Message::user(input));

        let mut completion = self.ask_model(session).await?;
        let mut round = 0usize;

        while completion.wants_tools() {
            round += 1;
            let calls = completion.tool_calls().to_vec();
            if calls.is_empty() {
                bail!("Model finished with tool_calls but requested no tools");
            }
            debug!(round, calls = calls.len(), "processing tool calls");

            session.append(Message::assistant_tool_calls(
                completion.message.content.clone(),
                calls.clone(),
            ));

            for call in &calls {
                handler.on_tool_call(&call.function.name, &call.function.arguments)?;

                let result = self
                    .tools
                    .dispatch(&self.resolver, &call.function)
                    .with_context(|| format!("Tool call '{}' failed", call.function.name))?;
                debug!(tool = %call.function.name, result = %clip(&result, LOG_CLIP), "tool call resolved");

                session.append(Message::tool_result(call.id.clone(), result));
            }

            completion = self.ask_model(session).await?;
        }

        Ok(completion)
    }

    async fn ask_model(&self, session: &Session) -> anyhow::Result<Completion> {
        self.llm
            .complete(session.snapshot(), self.tools.schemas())
            .await
    }
}
