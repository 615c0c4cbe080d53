use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::{Tool, ToolCall};
use crate::research::{Planner, Ranker, Writer};
use crate::tools::search::SearchTool;
use crate::tools::weather::WeatherTool;

/// The tool kinds the agent can dispatch to. Resolving the variant happens at
/// registration time, so an unknown name at dispatch is an explicit branch
/// rather than a missing-key surprise.
pub enum ToolHandler {
    Weather(WeatherTool),
    Plan(Planner),
    Search(SearchTool),
    Rank(Ranker),
    Write(Writer),
}

impl ToolHandler {
    pub fn definition(&self) -> Tool {
        match self {
            ToolHandler::Weather(tool) => tool.definition(),
            ToolHandler::Plan(tool) => tool.definition(),
            ToolHandler::Search(tool) => tool.definition(),
            ToolHandler::Rank(tool) => tool.definition(),
            ToolHandler::Write(tool) => tool.definition(),
        }
    }

    async fn call(&self, arguments: Value) -> AgentResult<Value> {
        match self {
            ToolHandler::Weather(tool) => tool.call(arguments).await,
            ToolHandler::Plan(tool) => tool.call(arguments).await,
            ToolHandler::Search(tool) => tool.call(arguments).await,
            ToolHandler::Rank(tool) => tool.call(arguments).await,
            ToolHandler::Write(tool) => tool.call(arguments).await,
        }
    }
}

/// Single source of truth mapping a tool name to its model-facing schema and
/// its handler. Registration order is the order schemas are advertised in.
#[derive(Default)]
pub struct ToolRegistry {
    entries: Vec<(Tool, ToolHandler)>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a handler under its schema name. A duplicate name is a
    /// configuration error, not a runtime condition.
    pub fn register(&mut self, handler: ToolHandler) -> Result<()> {
        let tool = handler.definition();
        if self.entries.iter().any(|(existing, _)| existing.name == tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        self.entries.push((tool, handler));
        Ok(())
    }

    /// The schemas advertised to the model
    pub fn schemas(&self) -> Vec<Tool> {
        self.entries.iter().map(|(tool, _)| tool.clone()).collect()
    }

    /// Execute a tool call. Handler failures come back as structured errors;
    /// nothing a tool does can take the loop down.
    pub async fn dispatch(&self, call: &ToolCall) -> AgentResult<Value> {
        let handler = self
            .entries
            .iter()
            .find(|(tool, _)| tool.name == call.name)
            .map(|(_, handler)| handler)
            .ok_or_else(|| AgentError::ToolNotFound(call.name.clone()))?;

        handler.call(call.arguments.clone()).await
    }
}
