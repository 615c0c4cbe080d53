use std::sync::Arc;

use indoc::formatdoc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use super::numbered_results;
use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::Provider;
use crate::search::SearchResult;

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Deserialize)]
struct RankArgs {
    query: String,
    results: Vec<SearchResult>,
    #[serde(default)]
    top_n: Option<usize>,
}

/// Reorders search results by relevance to a query and truncates to top-N
pub struct Ranker {
    provider: Arc<dyn Provider>,
}

impl Ranker {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub fn definition(&self) -> Tool {
        Tool::new(
            "rank_results",
            "Rank search results by relevance to a user query, keeping only the top N results.",
            json!({
                "type": "object",
                "required": ["query", "results"],
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The user query to rank results against."
                    },
                    "results": {
                        "type": "array",
                        "description": "An array of search result objects to rank.",
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
                    "top_n": {
                        "type": "integer",
                        "description": "The maximum number of top results to return (default: 5).",
                        "default": DEFAULT_TOP_N
                    }
                }
            }),
        )
    }

    pub async fn call(&self, arguments: Value) -> AgentResult<Value> {
        let args: RankArgs = serde_json::from_value(arguments)
            .map_err(|e| AgentError::InvalidParameters(e.to_string()))?;

        let ranked = self
            .rank(
                &args.query,
                &args.results,
                args.top_n.unwrap_or(DEFAULT_TOP_N),
            )
            .await;
        serde_json::to_value(ranked).map_err(|e| AgentError::Internal(e.to_string()))
    }

    /// Ask the model to reorder the results. Output length is always at most
    /// `top_n`; unparseable output falls back to the first `top_n` items in
    /// their original order.
    pub async fn rank(
        &self,
        query: &str,
        results: &[SearchResult],
        top_n: usize,
    ) -> Vec<SearchResult> {
        if results.is_empty() {
            return Vec::new();
        }

        let system_prompt = formatdoc! {r#"
            You are a ranking engine.
            Given a user query and a list of search results, rank the results from most relevant to least relevant.
            Return ONLY valid JSON in this format:
            [{{ "title": string, "content": string, "url": string }}]
            Keep at most {top_n} results."#};

        let user_prompt = format!("Query: {}\n\nResults:\n{}", query, numbered_results(results));

        let messages = vec![Message::user().with_text(user_prompt)];
        let text = match self.provider.complete(&system_prompt, &messages, &[]).await {
            Ok((response, _)) => response.normalized_text(),
            Err(e) => {
                warn!("ranker model call failed: {}", e);
                String::new()
            }
        };

        match serde_json::from_str::<Vec<SearchResult>>(&text) {
            Ok(mut ranked) => {
                ranked.truncate(top_n);
                ranked
            }
            Err(_) => {
                warn!("ranker returned invalid JSON, keeping original order");
                results.iter().take(top_n).cloned().collect()
            }
        }
    }
}
