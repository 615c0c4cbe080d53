//! The staged research components: Planner decomposes a question, the search
//! client gathers raw results, Ranker orders them, Writer produces the final
//! sourced answer. `ResearchPipeline` chains the four stages in fixed order;
//! the agent loop can also drive each of them individually as a tool.

pub mod pipeline;
pub mod planner;
pub mod ranker;
pub mod writer;

pub use pipeline::ResearchPipeline;
pub use planner::Planner;
pub use ranker::Ranker;
pub use writer::{AnswerStyle, Writer};

use crate::search::SearchResult;

// Shared prompt block listing results the way the ranking and writing prompts
// expect them
pub(crate) fn numbered_results(results: &[SearchResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            format!(
                "{}. Title: {}\n   Content: {}\n   URL: {}",
                index + 1,
                result.title,
                result.content,
                result.url.as_deref().unwrap_or("N/A")
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
