use anyhow::{anyhow, Result};
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::Write as _;
use std::time::Duration;

pub const DEFAULT_SEARCH_DEPTH: &str = "basic";
pub const DEFAULT_MAX_RESULTS: u32 = 5;

/// Configuration for the Tavily-shaped search endpoint. Constructed once at
/// process start and passed into every component that needs the search
/// capability.
#[derive(Debug, Clone)]
pub struct TavilyConfig {
    pub host: String,
    pub api_key: String,
}

impl TavilyConfig {
    pub fn new<H: Into<String>, K: Into<String>>(host: H, api_key: K) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
        }
    }
}

/// One hit returned by the search provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The provider's full response for one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// Outcome of one query inside a batch. Failures are isolated per item; a
/// batch always yields one outcome per input query, in input order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemOutcome {
    pub query: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<SearchResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct TavilyClient {
    client: Client,
    config: TavilyConfig,
}

impl TavilyClient {
    pub fn new(config: TavilyConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self { client, config })
    }

    /// Execute a single search. Non-2xx provider status is an error.
    pub async fn search(&self, query: &str, include_answer: bool) -> Result<SearchResponse> {
        let url = format!("{}/search", self.config.host.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&json!({
                "query": query,
                "search_depth": DEFAULT_SEARCH_DEPTH,
                "max_results": DEFAULT_MAX_RESULTS,
                "include_answer": include_answer,
            }))
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status => Err(anyhow!("Search API error: {}", status)),
        }
    }

    /// Execute every query concurrently. One failing query produces an error
    /// outcome without affecting its siblings, and the outcome order is the
    /// input order regardless of completion order.
    pub async fn batch_search(
        &self,
        queries: &[String],
        include_answer: bool,
    ) -> Vec<BatchItemOutcome> {
        let futures: Vec<_> = queries
            .iter()
            .map(|query| self.search(query, include_answer))
            .collect();
        let outcomes = join_all(futures).await;

        queries
            .iter()
            .zip(outcomes)
            .map(|(query, outcome)| match outcome {
                Ok(result) => BatchItemOutcome {
                    query: query.clone(),
                    success: true,
                    result: Some(result),
                    error: None,
                },
                Err(e) => BatchItemOutcome {
                    query: query.clone(),
                    success: false,
                    result: None,
                    error: Some(e.to_string()),
                },
            })
            .collect()
    }

    /// Render a response as a numbered text block for the model
    pub fn format_search_results(response: &SearchResponse) -> String {
        let mut formatted = format!("Search Query: \"{}\"\n\n", response.query);
        if let Some(answer) = &response.answer {
            let _ = write!(formatted, "Answer: {}\n\n", answer);
        }

        for (index, result) in response.results.iter().enumerate() {
            let _ = write!(formatted, "{}. {}\n   {}\n\n", index + 1, result.title, result.content);
        }

        formatted
    }
}
