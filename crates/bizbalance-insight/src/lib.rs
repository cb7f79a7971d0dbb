//! bizbalance-insight
//!
//! Gemini `generateContent` client implementing the core insight provider.

use std::{env, time::Duration};

use bizbalance_core::{InsightError, InsightProvider, InsightRequest};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Reads the API key from the environment, loading a `.env` file first.
pub fn api_key_from_env() -> Option<String> {
    dotenv::dotenv().ok();
    API_KEY_VARS.iter().find_map(|name| {
        env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl GeminiSettings {
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            endpoint: DEFAULT_ENDPOINT.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// Blocking HTTP client for the Gemini text-generation API.
pub struct GeminiProvider {
    settings: GeminiSettings,
    client: Client,
}

impl GeminiProvider {
    pub fn new(settings: GeminiSettings) -> Result<Self, InsightError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InsightError::Transport(err.to_string()))?;
        Ok(Self { settings, client })
    }
}

impl InsightProvider for GeminiProvider {
    fn is_configured(&self) -> bool {
        self.settings.api_key.is_some()
    }

    fn generate(&self, request: &InsightRequest) -> Result<String, InsightError> {
        let key = self
            .settings
            .api_key
            .as_deref()
            .ok_or(InsightError::MissingApiKey)?;
        let body = GenerateRequest::from_prompt(request.prompt());
        info!(model = %self.settings.model, "requesting financial insight");

        let response = self
            .client
            .post(self.settings.url())
            .query(&[("key", key)])
            .json(&body)
            .send()
            .map_err(|err| InsightError::Transport(err.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InsightError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateResponse = response
            .json()
            .map_err(|err| InsightError::Decode(err.to_string()))?;
        let text = payload.text().ok_or(InsightError::EmptyResponse)?;
        debug!(chars = text.len(), "insight response decoded");
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn from_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, if any are non-blank.
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
