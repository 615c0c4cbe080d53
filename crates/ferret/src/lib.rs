//! Tool-augmented research agent: a conversational loop that lets an
//! OpenAI-compatible model drive web search, ranking and answer writing
//! through tool calls, plus a deterministic plan → search → rank → write
//! pipeline built from the same components.

pub mod agent;
pub mod errors;
pub mod models;
pub mod providers;
pub mod research;
pub mod search;
pub mod tools;

pub use agent::Agent;
pub use research::ResearchPipeline;
