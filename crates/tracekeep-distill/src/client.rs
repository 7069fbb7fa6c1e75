//! Minimal Ollama HTTP client

use crate::DistillError;
use serde::Deserialize;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::debug;

const TAGS_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Default, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

/// `gemma3` matches both `gemma3` and `gemma3:latest`
pub fn model_matches(available: &str, wanted: &str) -> bool {
    available == wanted
        || available
            .strip_prefix(wanted)
            .is_some_and(|rest| rest.starts_with(':'))
}

/// Blocking facade over the async `reqwest` client
///
/// Each call drives its request to completion on a private current-thread
/// runtime, so callers stay synchronous.
pub struct OllamaClient {
    base_url: String,
    timeout: Duration,
    http: reqwest::Client,
    runtime: Runtime,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DistillError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(DistillError::Http)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            http,
            runtime,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Confirm the server answers and has `model` pulled
    pub fn check_model(&self, model: &str) -> Result<(), DistillError> {
        let url = format!("{}/api/tags", self.base_url);
        let tags: TagsResponse = self
            .runtime
            .block_on(async {
                self.http
                    .get(&url)
                    .timeout(TAGS_TIMEOUT)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<TagsResponse>()
                    .await
            })
            .map_err(|source| DistillError::Unreachable {
                url: self.base_url.clone(),
                source,
            })?;

        let names: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
        if names.iter().any(|name| model_matches(name, model)) {
            return Ok(());
        }

        let available = if names.is_empty() {
            "(none)".to_string()
        } else {
            names.join(", ")
        };
        Err(DistillError::ModelNotFound {
            model: model.to_string(),
            available,
        })
    }

    /// Non-streaming chat completion with one system and one user message
    pub fn chat(&self, model: &str, system: &str, user: &str) -> Result<String, DistillError> {
        let url = format!("{}/api/chat", self.base_url);
        let payload = serde_json::json!({
            "model": model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "stream": false,
        });

        let response: ChatResponse = self
            .runtime
            .block_on(async {
                self.http
                    .post(&url)
                    .timeout(self.timeout)
                    .json(&payload)
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<ChatResponse>()
                    .await
            })
            .map_err(|e| {
                if e.is_decode() {
                    DistillError::InvalidResponse(e.to_string())
                } else if e.is_connect() {
                    DistillError::Unreachable {
                        url: self.base_url.clone(),
                        source: e,
                    }
                } else {
                    DistillError::Http(e)
                }
            })?;

        let content = response.message.map(|m| m.content).unwrap_or_default();
        if content.is_empty() {
            return Err(DistillError::EmptyResponse);
        }

        debug!("Ollama response length: {} chars", content.chars().count());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_matches() {
        assert!(model_matches("gemma3", "gemma3"));
        assert!(model_matches("gemma3:latest", "gemma3"));
        assert!(!model_matches("gemma3n:e4b", "gemma3"));
        assert!(!model_matches("llama3", "gemma3"));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = OllamaClient::new("http://localhost:11434/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn test_unreachable_server() {
        let client = OllamaClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.check_model("gemma3").unwrap_err();
        assert!(matches!(err, DistillError::Unreachable { .. }));
    }

    #[test]
    fn test_tags_response_tolerates_missing_fields() {
        let tags: TagsResponse = serde_json::from_str(r#"{"models": [{"name": "gemma3:latest"}, {}]}"#).unwrap();
        assert_eq!(tags.models.len(), 2);
        assert_eq!(tags.models[1].name, "");
    }
}
