use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use tracing::error;

use ferret::agent::Agent;
use ferret::errors::AgentError;
use ferret::providers::base::Provider;
use ferret::providers::openai::OpenAiProvider;
use ferret::research::{Planner, Ranker, ResearchPipeline, Writer};
use ferret::search::TavilyClient;
use ferret::tools::registry::{ToolHandler, ToolRegistry};
use ferret::tools::search::SearchTool;
use ferret::tools::weather::WeatherTool;

use crate::state::AppState;

type ErrorResponse = (StatusCode, Json<Value>);

async fn research_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ErrorResponse> {
    let query = match body.get("query").and_then(|q| q.as_str()) {
        Some(query) => query.to_string(),
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing or invalid query" })),
            ));
        }
    };
    let mode = body.get("mode").and_then(|m| m.as_str()).unwrap_or("agent");

    let provider: Arc<dyn Provider> = Arc::new(
        OpenAiProvider::new(state.provider_config.clone()).map_err(internal_error)?,
    );
    let search =
        Arc::new(TavilyClient::new(state.search_config.clone()).map_err(internal_error)?);

    let outcome = match mode {
        "pipeline" => ResearchPipeline::new(provider, search).run(&query).await,
        _ => {
            let registry = build_registry(provider.clone(), search).map_err(internal_error)?;
            Agent::new(provider, registry).run(&query).await
        }
    };

    match outcome {
        Ok(result) => Ok(Json(json!({ "result": result }))),
        Err(AgentError::InvalidInput(message)) => {
            Err((StatusCode::BAD_REQUEST, Json(json!({ "error": message }))))
        }
        Err(e) => {
            error!("research request failed: {}", e);
            Err(internal_error(e))
        }
    }
}

fn build_registry(
    provider: Arc<dyn Provider>,
    search: Arc<TavilyClient>,
) -> anyhow::Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(ToolHandler::Weather(WeatherTool::new()))?;
    registry.register(ToolHandler::Plan(Planner::new(provider.clone())))?;
    registry.register(ToolHandler::Search(SearchTool::new(search)))?;
    registry.register(ToolHandler::Rank(Ranker::new(provider.clone())))?;
    registry.register(ToolHandler::Write(Writer::new(provider)))?;
    Ok(registry)
}

fn internal_error<E: std::fmt::Display>(e: E) -> ErrorResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Something went wrong", "details": e.to_string() })),
    )
}

// Configure routes for this module
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/research", post(research_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use ferret::providers::configs::OpenAiProviderConfig;
    use ferret::search::TavilyConfig;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState {
            provider_config: OpenAiProviderConfig {
                host: "http://localhost:0".to_string(),
                api_key: "test-key".to_string(),
                model: "gpt-4o-mini".to_string(),
                temperature: None,
                max_tokens: None,
            },
            search_config: TavilyConfig::new("http://localhost:0", "test-key"),
        }
    }

    async fn post_research(payload: &str) -> (StatusCode, Value) {
        let app = routes(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/research")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn test_missing_query_is_bad_request() {
        let (status, body) = post_research(r#"{"mode": "agent"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing or invalid query");
    }

    #[tokio::test]
    async fn test_non_string_query_is_bad_request() {
        let (status, body) = post_research(r#"{"query": 42}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing or invalid query");
    }

    #[tokio::test]
    async fn test_empty_query_is_bad_request() {
        // Reaches the agent, which rejects it before any network call
        let (status, body) = post_research(r#"{"query": "  "}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("non-empty"));
    }
}
