use std::sync::Arc;

use chrono::Utc;
use indoc::formatdoc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::errors::{AgentError, AgentResult};
use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::Provider;

#[derive(Debug, Deserialize)]
struct PlanArgs {
    user_question: String,
}

/// Decomposes a broad research question into focused sub-questions
pub struct Planner {
    provider: Arc<dyn Provider>,
}

impl Planner {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    pub fn definition(&self) -> Tool {
        Tool::new(
            "plan_research",
            "Break down a broad research question into 3 focused sub-questions \
             that together comprehensively answer the main question.",
            json!({
                "type": "object",
                "required": ["user_question"],
                "properties": {
                    "user_question": {
                        "type": "string",
                        "description": "The main research question to decompose."
                    }
                }
            }),
        )
    }

    pub async fn call(&self, arguments: Value) -> AgentResult<Value> {
        let args: PlanArgs = serde_json::from_value(arguments)
            .map_err(|e| AgentError::InvalidParameters(e.to_string()))?;

        let sub_questions = self.plan(&args.user_question).await;
        Ok(json!(sub_questions))
    }

    /// Ask the model for sub-questions. Never fails: unparseable output falls
    /// back to a newline split with empty lines discarded.
    pub async fn plan(&self, user_question: &str) -> Vec<String> {
        let current_date = Utc::now().format("%B %Y");
        let system_prompt = formatdoc! {"
            You are a research planning expert.
            Current date: {current_date}

            Decompose this research question into 3 focused sub-questions
            that together comprehensively answer the main question.
            Return ONLY a valid JSON array of strings."};

        let messages = vec![Message::user().with_text(user_question)];
        let text = match self.provider.complete(&system_prompt, &messages, &[]).await {
            Ok((response, _)) => response.normalized_text(),
            Err(e) => {
                warn!("planner model call failed: {}", e);
                String::new()
            }
        };

        match serde_json::from_str::<Vec<String>>(&text) {
            Ok(sub_questions) => sub_questions,
            Err(_) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}
