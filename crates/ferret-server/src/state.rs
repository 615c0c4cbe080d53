use ferret::providers::configs::OpenAiProviderConfig;
use ferret::search::TavilyConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider_config: OpenAiProviderConfig,
    pub search_config: TavilyConfig,
}
