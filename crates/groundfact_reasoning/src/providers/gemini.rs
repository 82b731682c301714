//! Google Gemini `generateContent` provider.

use crate::api_types::{GenerateRequest, GenerateResponse};
use crate::llm::{LlmClient, LlmError};
use crate::providers::mock::MockProvider;
use groundfact_core::LlmConfig;
use reqwest::Client;
use std::time::Duration;
use url::Url;

const PROVIDER: &str = "Gemini";

/// Credential value that short-circuits the network for local runs.
pub const MOCK_API_KEY: &str = "mock";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
}

impl GeminiClient {
    /// Build a client handle. Fails on an unusable base URL or model name.
    pub fn new(config: &LlmConfig, api_key: &str) -> Result<Self, LlmError> {
        let model = config.model.trim();
        if model.is_empty() || model.contains('/') || model.contains(char::is_whitespace) {
            return Err(LlmError::Config(format!("invalid model name {:?}", config.model)));
        }

        let base = Url::parse(&config.base_url)
            .map_err(|e| LlmError::Config(format!("invalid base URL {:?}: {}", config.base_url, e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(LlmError::Config(format!(
                "unsupported base URL scheme {:?}",
                base.scheme()
            )));
        }
        // Handle trailing slash just in case
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            base.as_str().trim_end_matches('/'),
            model
        );
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| LlmError::Config(format!("invalid endpoint {:?}: {}", endpoint, e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(LlmError::Build)?;

        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    #[tracing::instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        if self.api_key == MOCK_API_KEY {
            return Ok(MockProvider::canned_response(&self.model));
        }

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|source| LlmError::Network { provider: PROVIDER, source })?;

        let status = response.status();
        let resp_text = response
            .text()
            .await
            .map_err(|source| LlmError::Network { provider: PROVIDER, source })?;

        if !status.is_success() {
            return Err(LlmError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body: resp_text.chars().take(500).collect(),
            });
        }

        tracing::debug!(
            "Gemini raw response (first 2000 chars): {}",
            resp_text.chars().take(2000).collect::<String>()
        );
        serde_json::from_str(&resp_text).map_err(|source| LlmError::Decode { provider: PROVIDER, source })
    }
}
