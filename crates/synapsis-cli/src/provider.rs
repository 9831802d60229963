//! OpenAI-compatible chat completion backend

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;
use synapsis_core::{GenerationError, LlmConfig, TextGenerator};

/// Chat completion failures
#[derive(Debug, thiserror::Error)]
pub(crate) enum ProviderError {
    #[error("authentication error: {0}")]
    Authentication(String),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("response carried no message content")]
    EmptyResponse,
}

/// Blocking client for `POST {base_url}/chat/completions`
#[derive(Debug, Clone)]
pub(crate) struct OpenAiGenerator {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiGenerator {
    /// Build a generator from config, reading the key from `api_key_env`
    pub(crate) fn from_config(config: &LlmConfig) -> Result<Self, ProviderError> {
        let api_key = std::env::var(&config.api_key_env).ok().filter(|key| !key.is_empty());
        if api_key.is_none() {
            tracing::warn!(
                var = %config.api_key_env,
                "no API key set, sending unauthenticated requests"
            );
        }
        Self::new(config, api_key)
    }

    pub(crate) fn new(config: &LlmConfig, api_key: Option<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(build_headers(api_key.as_deref())?)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
        })
    }

    pub(crate) fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let payload = build_payload(&self.model, prompt);
        tracing::debug!(
            model = %self.model,
            prompt_bytes = prompt.len(),
            "sending chat completion"
        );

        let response = self.client.post(&self.endpoint).json(&payload).send()?;
        let status = response.status().as_u16();
        let text = response.text()?;
        if !(200..300).contains(&status) {
            return Err(map_error(status, &text));
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| ProviderError::Api {
            status,
            message: e.to_string(),
        })?;
        parse_content(&body)
    }
}

impl TextGenerator for OpenAiGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        Ok(self.complete(prompt)?)
    }
}

fn build_headers(api_key: Option<&str>) -> Result<HeaderMap, ProviderError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(key) = api_key {
        let auth = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|e| ProviderError::InvalidRequest(e.to_string()))?;
        headers.insert(AUTHORIZATION, auth);
    }
    Ok(headers)
}

fn build_payload(model: &str, prompt: &str) -> Value {
    serde_json::json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
        "temperature": 0.7,
    })
}

fn parse_content(body: &Value) -> Result<String, ProviderError> {
    body.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .filter(|content| !content.trim().is_empty())
        .map(str::to_string)
        .ok_or(ProviderError::EmptyResponse)
}

fn map_error(status: u16, body: &str) -> ProviderError {
    match status {
        401 | 403 => ProviderError::Authentication(body.to_string()),
        429 => ProviderError::RateLimited,
        _ => ProviderError::Api {
            status,
            message: body.to_string(),
        },
    }
}
