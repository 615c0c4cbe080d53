use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{AgentError, AgentResult};
use crate::models::message::{Message, ToolRequest};
use crate::models::role::Role;
use crate::models::tool::Tool;
use crate::providers::base::{Provider, Usage};
use crate::tools::registry::ToolRegistry;

/// Upper bound on model calls for a single run
pub const MAX_ITERATIONS: usize = 5;

// Attempts per model call before giving up on the provider
const COMPLETION_ATTEMPTS: usize = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

const SYSTEM_PROMPT: &str = "You are a helpful AI agent. Give highly specific answers \
    based on the information you're provided. Prefer to gather information with the \
    tools provided to you rather than giving basic, generic answers.";

/// The conversational agent loop: alternates between asking the model what to
/// do next and executing the tools it requests, until the model stops or the
/// iteration budget runs out.
pub struct Agent {
    provider: Arc<dyn Provider>,
    registry: ToolRegistry,
}

impl Agent {
    pub fn new(provider: Arc<dyn Provider>, registry: ToolRegistry) -> Self {
        Self { provider, registry }
    }

    /// Run the loop for one query and return the final answer
    pub async fn run(&self, query: &str) -> AgentResult<String> {
        self.run_internal(query).await.map(|(answer, _)| answer)
    }

    async fn run_internal(&self, query: &str) -> AgentResult<(String, Vec<Message>)> {
        if query.trim().is_empty() {
            return Err(AgentError::InvalidInput(
                "query must be a non-empty string".into(),
            ));
        }

        let tools = self.registry.schemas();
        let mut messages = vec![Message::user().with_text(query)];

        for iteration in 0..MAX_ITERATIONS {
            debug!(iteration = iteration + 1, "requesting completion");
            let response = match self.complete_with_retry(&messages, &tools).await {
                Ok((response, usage)) => {
                    debug!(?usage, "completion received");
                    response
                }
                Err(e) => {
                    // Degrade to whatever the conversation has produced so far;
                    // with nothing gathered yet the provider error is terminal
                    warn!("model call failed after retries: {}", e);
                    let answer = Self::best_effort(&messages)
                        .ok_or_else(|| AgentError::Internal(e.to_string()))?;
                    return Ok((answer, messages));
                }
            };

            messages.push(response.clone());

            let tool_requests: Vec<&ToolRequest> = response
                .content
                .iter()
                .filter_map(|content| content.as_tool_request())
                .collect();

            if tool_requests.is_empty() {
                // No more tool calls, the model has stopped
                let answer = response.normalized_text();
                return Ok((answer, messages));
            }

            // Dispatch each request in parallel
            let futures: Vec<_> = tool_requests
                .iter()
                .map(|request| self.dispatch(request))
                .collect();

            // Process all the futures in parallel but wait until all are finished
            let outputs = join_all(futures).await;

            // Combine the results into one message, keeping the original call
            // order so every id is answered deterministically
            let mut tool_message = Message::user();
            for (request, output) in tool_requests.iter().zip(outputs.into_iter()) {
                tool_message = tool_message.with_tool_response(request.id.clone(), output);
            }
            messages.push(tool_message);
        }

        warn!("iteration budget exhausted, returning best-effort answer");
        let answer = Self::best_effort(&messages).unwrap_or_default();
        Ok((answer, messages))
    }

    /// Execute a single tool request through the registry. A request the wire
    /// codec already rejected (bad name, undecodable arguments) answers with
    /// that error directly.
    async fn dispatch(&self, request: &ToolRequest) -> AgentResult<Value> {
        let call = request.tool_call.clone()?;
        self.registry.dispatch(&call).await
    }

    async fn complete_with_retry(
        &self,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<(Message, Usage)> {
        let mut delay = RETRY_BASE_DELAY;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.provider.complete(SYSTEM_PROMPT, messages, tools).await {
                Ok(result) => return Ok(result),
                Err(e) if attempt < COMPLETION_ATTEMPTS => {
                    warn!(attempt, "model call failed, retrying: {}", e);
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    // The most recent assistant content in the transcript, normalized
    fn best_effort(messages: &[Message]) -> Option<String> {
        messages
            .iter()
            .rev()
            .filter(|message| message.role == Role::Assistant)
            .map(Message::normalized_text)
            .find(|text| !text.is_empty())
    }
}
