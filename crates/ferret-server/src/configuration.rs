use crate::error::{to_env_var, ConfigError};
use config::{Config, Environment};
use ferret::providers::configs::OpenAiProviderConfig;
use ferret::search::TavilyConfig;
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Default, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Failed to parse socket address")
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_provider_host")]
    pub host: String,
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_search_host")]
    pub host: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    pub search: SearchSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load_and_validate()
    }

    pub fn provider_config(&self) -> OpenAiProviderConfig {
        OpenAiProviderConfig {
            host: self.provider.host.clone(),
            api_key: self.provider.api_key.clone(),
            model: self.provider.model.clone(),
            temperature: self.provider.temperature,
            max_tokens: self.provider.max_tokens,
        }
    }

    pub fn search_config(&self) -> TavilyConfig {
        TavilyConfig::new(self.search.host.clone(), self.search.api_key.clone())
    }

    fn load_and_validate() -> Result<Self, ConfigError> {
        // Start with default configuration
        let config = Config::builder()
            // Server defaults
            .set_default("server.host", default_host())?
            .set_default("server.port", default_port())?
            // Provider defaults
            .set_default("provider.host", default_provider_host())?
            .set_default("provider.model", default_model())?
            // Search defaults
            .set_default("search.host", default_search_host())?
            // Layer on the environment variables
            .add_source(
                Environment::with_prefix("FERRET")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        // Try to deserialize the configuration
        let result: Result<Self, config::ConfigError> = config.try_deserialize();

        // Handle missing field errors specially
        match result {
            Ok(settings) => Ok(settings),
            Err(err) => {
                tracing::debug!("Configuration error: {:?}", &err);

                // Handle both NotFound and missing field message variants
                let error_str = err.to_string();
                if error_str.starts_with("missing field") {
                    // Extract field name from error message "missing field `api_key`"
                    let field = error_str
                        .trim_start_matches("missing field `")
                        .trim_end_matches("`");
                    let env_var = to_env_var(field);
                    Err(ConfigError::MissingEnvVar { env_var })
                } else if let config::ConfigError::NotFound(field) = &err {
                    let env_var = to_env_var(field);
                    Err(ConfigError::MissingEnvVar { env_var })
                } else {
                    Err(ConfigError::Other(err))
                }
            }
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_provider_host() -> String {
    "https://api.openai.com".to_string()
}

fn default_search_host() -> String {
    "https://api.tavily.com".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clean_env() {
        for (key, _) in env::vars() {
            if key.starts_with("FERRET_") {
                env::remove_var(&key);
            }
        }
    }

    fn set_required() {
        env::set_var("FERRET_PROVIDER__API_KEY", "test-key");
        env::set_var("FERRET_SEARCH__API_KEY", "search-key");
    }

    #[test]
    #[serial]
    fn test_default_settings() {
        clean_env();
        set_required();

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8000);

        assert_eq!(settings.provider.host, "https://api.openai.com");
        assert_eq!(settings.provider.api_key, "test-key");
        assert_eq!(settings.provider.model, "gpt-4o-mini");
        assert_eq!(settings.provider.temperature, None);
        assert_eq!(settings.provider.max_tokens, None);

        assert_eq!(settings.search.host, "https://api.tavily.com");
        assert_eq!(settings.search.api_key, "search-key");

        clean_env();
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        clean_env();
        set_required();
        env::set_var("FERRET_SERVER__PORT", "8080");
        env::set_var("FERRET_PROVIDER__HOST", "https://custom.openai.example");
        env::set_var("FERRET_PROVIDER__MODEL", "gpt-4o");
        env::set_var("FERRET_PROVIDER__TEMPERATURE", "0.8");
        env::set_var("FERRET_SEARCH__HOST", "https://custom.tavily.example");

        let settings = Settings::new().unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.provider.host, "https://custom.openai.example");
        assert_eq!(settings.provider.model, "gpt-4o");
        assert_eq!(settings.provider.temperature, Some(0.8));
        assert_eq!(settings.search.host, "https://custom.tavily.example");

        clean_env();
    }

    #[test]
    #[serial]
    fn test_missing_api_key_reports_env_var() {
        clean_env();

        let result = Settings::new();
        assert!(matches!(result, Err(ConfigError::MissingEnvVar { .. })));
    }

    #[test]
    fn test_socket_addr_conversion() {
        let server_settings = ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 8000,
        };
        let addr = server_settings.socket_addr();
        assert_eq!(addr.to_string(), "127.0.0.1:8000");
    }
}
