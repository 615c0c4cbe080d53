use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {env_var}")]
    MissingEnvVar { env_var: String },

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

/// Map a settings field path to the environment variable that supplies it
pub fn to_env_var(field: &str) -> String {
    format!("FERRET_{}", field.replace('.', "__").to_uppercase())
}
