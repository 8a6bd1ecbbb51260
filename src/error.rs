use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error(
        "no OPENAI_API_KEY/OPENAI_BASE_URL env vars found and {} missing; \
         provide credentials via env vars or create {} from credentials.example.yml",
        path.display(),
        path.display()
    )]
    ConfigurationMissing { path: PathBuf },

    #[error("model `{model}` not found in credentials")]
    ModelNotFound { model: String },

    #[error("malformed credential entry for model `{model}`: {source}")]
    MalformedCredential {
        model: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid credentials file {}: {source}", path.display())]
    InvalidConfiguration {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("OpenAI error: {0}")]
    #[cfg(feature = "backend-azure")]
    OpenAI(#[from] async_openai::error::OpenAIError),

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("blocking call made from within an async runtime; use the async API instead")]
    NestedRuntime,

    #[error("failed to start blocking runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

pub type Result<T, E = CompletionError> = std::result::Result<T, E>;
