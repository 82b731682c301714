use crate::api_types::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use reqwest::StatusCode;

/// How the retry driver may treat an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Worth another attempt: network failures, rate limits, 5xx.
    Transient,
    /// Retrying will not help unless the caller opts in anyway.
    Fatal,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("invalid client configuration: {0}")]
    Config(String),

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("{provider} network error: {source}")]
    Network {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API error ({status}): {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("failed to parse {provider} response: {source}")]
    Decode {
        provider: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl LlmError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LlmError::Network { .. } => ErrorKind::Transient,
            LlmError::Status { status, .. } => match StatusCode::from_u16(*status) {
                Ok(code) if is_retryable_status(code) => ErrorKind::Transient,
                _ => ErrorKind::Fatal,
            },
            LlmError::Config(_) | LlmError::Build(_) | LlmError::Decode { .. } => ErrorKind::Fatal,
        }
    }
}

/// Determine if a status code is retryable.
pub(crate) fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS         // 429
        || status == StatusCode::REQUEST_TIMEOUT    // 408
        || status.is_server_error()                 // 5xx
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider label used in logs.
    fn name(&self) -> &'static str;

    /// One generation call. No retries happen at this layer.
    async fn complete(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError>;
}
