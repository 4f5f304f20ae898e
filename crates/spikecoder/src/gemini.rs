use crate::generate::ModelBackend;
use crate::prelude::*;
use spikecoder_core::gemini::{
    describe_error, endpoint, response_text, to_wire, GenerateContentResponse, DEFAULT_BASE_URL,
    DEFAULT_MODEL,
};
use spikecoder_core::generation::ModelRequest;
use std::time::Duration;

/// Gemini configuration from environment variables
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Load configuration from environment variables
    /// Uses GEMINI_API_KEY if set, otherwise falls back to API_KEY
    /// Uses GEMINI_BASE_URL, GEMINI_MODEL and GEMINI_TIMEOUT_SECS with defaults
    /// Blank values count as unset
    pub fn from_env() -> Result<Self> {
        let api_key = first_non_blank([env_var("GEMINI_API_KEY"), env_var("API_KEY")])
            .ok_or_else(|| {
                eyre!("Neither GEMINI_API_KEY nor API_KEY environment variable is set")
            })?;

        let timeout = match first_non_blank([env_var("GEMINI_TIMEOUT_SECS")]) {
            Some(value) => Some(
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| eyre!("Invalid GEMINI_TIMEOUT_SECS '{}': {}", value, e))?,
            ),
            None => None,
        };

        Ok(Self {
            api_key,
            base_url: first_non_blank([env_var("GEMINI_BASE_URL")])
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: first_non_blank([env_var("GEMINI_MODEL")])
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout,
        })
    }

    /// Apply CLI overrides to the configuration
    pub fn with_overrides(
        mut self,
        model: Option<String>,
        base_url: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Some(Duration::from_secs(secs));
        }
        self
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// The first value that is set and not blank.
fn first_non_blank<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
}

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| eyre!("Invalid API key header value: {}", e))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", api_key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }
}

impl ModelBackend for GeminiClient {
    async fn complete(&self, request: &ModelRequest) -> Result<Option<String>, GenerationError> {
        let url = endpoint(&self.base_url, &request.model);

        let response = self
            .http
            .post(&url)
            .json(&to_wire(request))
            .send()
            .await
            .map_err(|e| GenerationError::UpstreamError(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::UpstreamError(format!("response read failed: {e}")))?;

        if !status.is_success() {
            return Err(GenerationError::UpstreamError(describe_error(
                status.as_u16(),
                &body,
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            GenerationError::UpstreamError(format!("invalid response envelope: {e}"))
        })?;

        Ok(response_text(&parsed))
    }
}
