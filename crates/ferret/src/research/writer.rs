use std::sync::Arc;

use indoc::formatdoc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use super::numbered_results;
use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::Provider;
use crate::search::SearchResult;

/// Returned when the model produces no content at all
pub const NO_ANSWER_FALLBACK: &str = "No answer generated.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStyle {
    #[default]
    Concise,
    Detailed,
}

impl AnswerStyle {
    fn as_str(&self) -> &'static str {
        match self {
            AnswerStyle::Concise => "concise",
            AnswerStyle::Detailed => "detailed",
        }
    }
}

#[derive(Debug, Deserialize)]
struct WriteArgs {
    query: String,
    ranked_results: Vec<SearchResult>,
    #[serde(default)]
    style: Option<AnswerStyle>,
}

/// Synthesizes the final answer from ranked results
pub struct Writer {
    provider: Arc<dyn Provider>,
}

impl Writer {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub fn definition(&self) -> Tool {
        Tool::new(
            "write_answer",
            "Generate a clear, factual, and well-structured answer to the user query \
             using only the ranked search results. Supports concise or detailed styles.",
            json!({
                "type": "object",
                "required": ["query", "ranked_results"],
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The original user query to answer."
                    },
                    "ranked_results": {
                        "type": "array",
                        "description": "An array of ranked search results to base the answer on.",
                        "items": {
                            "type": "object",
                            "required": ["title", "content"],
                            "properties": {
                                "title": { "type": "string", "description": "The title of the search result." },
                                "content": { "type": "string", "description": "The content or snippet of the search result." },
                                "url": { "type": "string", "description": "The optional URL of the search result." }
                            }
                        }
                    },
                    "style": {
                        "type": "string",
                        "description": "The style of the answer, either concise or detailed (default: concise).",
                        "enum": ["concise", "detailed"],
                        "default": "concise"
                    }
                }
            }),
        )
    }

    pub async fn call(&self, arguments: Value) -> AgentResult<Value> {
        let args: WriteArgs = serde_json::from_value(arguments)
            .map_err(|e| AgentError::InvalidParameters(e.to_string()))?;

        let answer = self
            .write(
                &args.query,
                &args.ranked_results,
                args.style.unwrap_or_default(),
            )
            .await;
        Ok(json!(answer))
    }

    /// Write the final answer, grounded only in the supplied results. Empty
    /// model content degrades to a fixed placeholder instead of an error.
    pub async fn write(
        &self,
        query: &str,
        ranked_results: &[SearchResult],
        style: AnswerStyle,
    ) -> String {
        let style_str = style.as_str();
        let system_prompt = formatdoc! {"
            You are a research assistant.
            Your job is to write a clear, factual, and well-structured answer to the user's question
            using ONLY the provided ranked search results.
            Cite sources inline using [title] or [url] when relevant.
            If the answer cannot be fully determined, explain the uncertainty.
            If no results are provided, state that there is insufficient information to answer.

            Answer style: {style_str}."};

        let user_prompt = format!(
            "User Query: {}\n\nRanked Results:\n{}",
            query,
            numbered_results(ranked_results)
        );

        let messages = vec![Message::user().with_text(user_prompt)];
        let text = match self.provider.complete(&system_prompt, &messages, &[]).await {
            Ok((response, _)) => response.normalized_text(),
            Err(e) => {
                warn!("writer model call failed: {}", e);
                String::new()
            }
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            NO_ANSWER_FALLBACK.to_string()
        } else {
            trimmed.to_string()
        }
    }
}
