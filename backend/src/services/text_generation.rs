//! Text generation collaborator
//!
//! Advice text comes from a local Ollama server. The engine only supplies the
//! rendered prompt and returns whatever prose comes back.

use crate::config::AiConfig;
use crate::error::ApiError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fitness_analytics_shared::AdvicePrompt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[async_trait]
pub trait TextGenerator: Send + Sync + 'static {
    /// Model identifier reported back to callers
    fn model(&self) -> &str;

    async fn generate(&self, prompt: &AdvicePrompt) -> Result<String, ApiError>;
}

/// Pick the generator for the configured AI settings
pub fn from_config(config: &AiConfig) -> Result<Arc<dyn TextGenerator>> {
    if config.enabled {
        Ok(Arc::new(OllamaTextGenerator::new(config)?))
    } else {
        Ok(Arc::new(DisabledTextGenerator))
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama `/api/generate` client
pub struct OllamaTextGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaTextGenerator {
    pub fn new(config: &AiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building Ollama HTTP client")?;

        Ok(Self {
            client,
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaTextGenerator {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &AdvicePrompt) -> Result<String, ApiError> {
        let url = format!("{}/api/generate", self.base_url);
        let rendered = prompt.render();
        debug!(model = %self.model, prompt_chars = rendered.len(), "Requesting advice");

        let body = GenerateRequest {
            model: &self.model,
            prompt: &rendered,
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            warn!(error = %e, "Ollama request failed");
            ApiError::ServiceUnavailable("Advice generation is unavailable".to_string())
        })?;

        if !response.status().is_success() {
            warn!(status = %response.status(), "Ollama returned an error status");
            return Err(ApiError::ServiceUnavailable(
                "Advice generation is unavailable".to_string(),
            ));
        }

        let payload: GenerateResponse = response
            .json()
            .await
            .context("decoding Ollama response")
            .map_err(ApiError::Internal)?;

        Ok(payload.response)
    }
}

/// Generator used when AI is switched off
pub struct DisabledTextGenerator;

#[async_trait]
impl TextGenerator for DisabledTextGenerator {
    fn model(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _prompt: &AdvicePrompt) -> Result<String, ApiError> {
        Err(ApiError::ServiceUnavailable(
            "Advice generation is disabled".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitness_analytics_shared::WindowAggregate;
    use chrono::NaiveDate;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn prompt() -> AdvicePrompt {
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        AdvicePrompt::build(&WindowAggregate::default(), today)
    }

    fn config(url: String) -> AiConfig {
        AiConfig {
            enabled: true,
            ollama_url: url,
            model: "llama3.2".to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_ollama_returns_response_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3.2",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "llama3.2",
                "response": "Add one more rest day.",
                "done": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let generator = OllamaTextGenerator::new(&config(server.uri())).unwrap();
        let advice = generator.generate(&prompt()).await.unwrap();

        assert_eq!(advice, "Add one more rest day.");
    }

    #[tokio::test]
    async fn test_ollama_error_status_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let generator = OllamaTextGenerator::new(&config(server.uri())).unwrap();
        let err = generator.generate(&prompt()).await.unwrap_err();

        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_disabled_generator_is_unavailable() {
        let err = DisabledTextGenerator.generate(&prompt()).await.unwrap_err();
        assert!(matches!(err, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_from_config_respects_enabled_flag() {
        let disabled = from_config(&AiConfig::default()).unwrap();
        assert_eq!(disabled.model(), "disabled");

        let enabled = from_config(&config("http://localhost:11434/".to_string())).unwrap();
        assert_eq!(enabled.model(), "llama3.2");
    }
}
