use thiserror::Error;

/// Expected failures of the summary backend
#[derive(Debug, Error)]
pub enum DistillError {
    #[error("cannot connect to Ollama at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("model '{model}' not found. Available: {available}")]
    ModelNotFound { model: String, available: String },

    #[error("Ollama request failed: {0}")]
    Http(#[source] reqwest::Error),

    #[error("invalid response from Ollama: {0}")]
    InvalidResponse(String),

    #[error("empty response from Ollama")]
    EmptyResponse,

    #[error("failed to start HTTP runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
