use std::sync::Arc;

use tracing::{debug, info};

use super::ranker::DEFAULT_TOP_N;
use super::{AnswerStyle, Planner, Ranker, Writer};
use crate::errors::{AgentError, AgentResult};
use crate::providers::base::Provider;
use crate::search::{SearchResult, TavilyClient};

/// Deterministic plan → search → rank → write orchestrator. There is no
/// model-driven control flow: each stage runs exactly once, in fixed order,
/// and every stage's best-effort fallback propagates forward.
pub struct ResearchPipeline {
    planner: Planner,
    search: Arc<TavilyClient>,
    ranker: Ranker,
    writer: Writer,
}

impl ResearchPipeline {
    pub fn new(provider: Arc<dyn Provider>, search: Arc<TavilyClient>) -> Self {
        Self {
            planner: Planner::new(provider.clone()),
            search,
            ranker: Ranker::new(provider.clone()),
            writer: Writer::new(provider),
        }
    }

    pub async fn run(&self, query: &str) -> AgentResult<String> {
        if query.trim().is_empty() {
            return Err(AgentError::InvalidInput(
                "query must be a non-empty string".into(),
            ));
        }

        let sub_questions = self.planner.plan(query).await;
        info!(count = sub_questions.len(), "planned sub-questions");

        let outcomes = self.search.batch_search(&sub_questions, true).await;
        let results: Vec<SearchResult> = outcomes
            .into_iter()
            .filter_map(|outcome| outcome.result)
            .flat_map(|response| response.results)
            .collect();
        debug!(count = results.len(), "aggregated search results");

        let ranked = self.ranker.rank(query, &results, DEFAULT_TOP_N).await;
        let answer = self.writer.write(query, &ranked, AnswerStyle::default()).await;

        Ok(answer)
    }
}
