//! The grounded-query invoker: one request, a bounded number of attempts.

use crate::api_types::{GenerateRequest, GenerateResponse};
use crate::llm::LlmClient;
use crate::retry::{with_retry, InvokeFailure, RetryConfig};
use groundfact_core::{QueryRequest, QueryResult, EXHAUSTED_REASON};

/// Call the generation service until one attempt succeeds or the retry
/// ceiling is reached. The successful response is returned unmodified, even
/// when it carries no answer.
#[tracing::instrument(skip_all, fields(provider = client.name(), max_attempts = retry.attempts()))]
pub async fn invoke(
    client: &dyn LlmClient,
    request: &QueryRequest,
    retry: &RetryConfig,
) -> Result<GenerateResponse, InvokeFailure> {
    let body = GenerateRequest::from(request);
    let body = &body;
    with_retry(retry, client.name(), move |_attempt| client.complete(body)).await
}

/// `invoke`, folded into a `QueryResult`.
pub async fn query(
    client: &dyn LlmClient,
    request: &QueryRequest,
    retry: &RetryConfig,
) -> QueryResult {
    match invoke(client, request, retry).await {
        Ok(response) => QueryResult::from(&response),
        Err(failure) => {
            tracing::error!("Grounded query failed: {}", failure);
            QueryResult::failure(EXHAUSTED_REASON)
        }
    }
}
