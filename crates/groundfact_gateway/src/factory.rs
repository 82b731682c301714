use groundfact_core::LlmConfig;
use groundfact_reasoning::providers::GeminiClient;
use groundfact_reasoning::{LlmClient, LlmError};
use std::sync::Arc;

/// Builds the client handle used for one page request.
pub trait ClientFactory: Send + Sync {
    fn build(&self, config: &LlmConfig, api_key: &str) -> Result<Arc<dyn LlmClient>, LlmError>;
}

/// Builds a fresh [`GeminiClient`] per request.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiFactory;

impl ClientFactory for GeminiFactory {
    fn build(&self, config: &LlmConfig, api_key: &str) -> Result<Arc<dyn LlmClient>, LlmError> {
        Ok(Arc::new(GeminiClient::new(config, api_key)?))
    }
}

/// Hands out the same client every time.
#[derive(Clone)]
pub struct SharedClientFactory(pub Arc<dyn LlmClient>);

impl ClientFactory for SharedClientFactory {
    fn build(&self, _config: &LlmConfig, _api_key: &str) -> Result<Arc<dyn LlmClient>, LlmError> {
        Ok(self.0.clone())
    }
}
