/// Configuration for an OpenAI-compatible chat-completions endpoint.
/// Constructed once at process start and passed into every component that
/// needs the model capability.
#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}
