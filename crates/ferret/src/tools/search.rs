use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::Tool;
use crate::search::TavilyClient;

#[derive(Debug, Deserialize)]
struct SearchArgs {
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    queries: Option<Vec<String>>,
    #[serde(default)]
    include_answer: Option<bool>,
}

/// Web search as a tool. Accepts a single query or a batch; a provider
/// failure comes back as a `success: false` payload, never as a dispatch
/// error — the model is expected to read it and adapt.
pub struct SearchTool {
    client: Arc<TavilyClient>,
}

impl SearchTool {
    pub fn new(client: Arc<TavilyClient>) -> Self {
        Self { client }
    }

    pub fn definition(&self) -> Tool {
        Tool::new(
            "search_web",
            "Perform a web search. Accepts either a single query string or an array of \
             queries for batch search. Returns results with optional summarized answers.",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "A single search query to look up."
                    },
                    "queries": {
                        "type": "array",
                        "description": "An array of queries to run in batch mode.",
                        "items": { "type": "string" }
                    },
                    "include_answer": {
                        "type": "boolean",
                        "description": "Whether to include a summarized answer in the response (default: true)."
                    }
                }
            }),
        )
    }

    pub async fn call(&self, arguments: Value) -> AgentResult<Value> {
        let args: SearchArgs = serde_json::from_value(arguments)
            .map_err(|e| AgentError::InvalidParameters(e.to_string()))?;

        let include_answer = args.include_answer.unwrap_or(true);

        if let Some(queries) = args.queries {
            let outcomes = self.client.batch_search(&queries, include_answer).await;
            return serde_json::to_value(outcomes)
                .map_err(|e| AgentError::Internal(e.to_string()));
        }

        let query = match args.query {
            Some(query) if !query.trim().is_empty() => query,
            _ => {
                return Ok(json!({
                    "success": false,
                    "error": "Query parameter is required and must be a non-empty string",
                }));
            }
        };

        match self.client.search(&query, include_answer).await {
            Ok(response) => {
                let formatted = TavilyClient::format_search_results(&response);
                let mut payload = serde_json::to_value(&response)
                    .map_err(|e| AgentError::Internal(e.to_string()))?;
                payload["success"] = json!(true);
                payload["formatted_results"] = json!(formatted);
                Ok(payload)
            }
            Err(e) => Ok(json!({
                "success": false,
                "error": e.to_string(),
            })),
        }
    }
}
