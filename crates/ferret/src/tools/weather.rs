use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::Tool;

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    location: String,
}

/// Demo weather lookup. Returns a canned reading so the loop can be exercised
/// without a weather provider behind it.
#[derive(Debug, Clone, Default)]
pub struct WeatherTool;

impl WeatherTool {
    pub fn new() -> Self {
        Self
    }

    pub fn definition(&self) -> Tool {
        Tool::new(
            "get_current_weather",
            "Get the current weather for a location.",
            json!({
                "type": "object",
                "required": ["location"],
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "The city to look up, e.g. Paris"
                    }
                }
            }),
        )
    }

    pub async fn call(&self, arguments: Value) -> AgentResult<Value> {
        let args: WeatherArgs = serde_json::from_value(arguments)
            .map_err(|e| AgentError::InvalidParameters(e.to_string()))?;

        if args.location.trim().is_empty() {
            return Err(AgentError::InvalidParameters(
                "'location' must be a non-empty string".into(),
            ));
        }

        Ok(json!({
            "location": args.location,
            "temperature": "75",
            "forecast": "sunny",
        }))
    }
}
