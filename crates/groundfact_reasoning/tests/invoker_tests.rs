//! Integration tests for the grounded-query invoker.
//!
//! A scripted client replays a queue of outcomes and records when each call
//! happened, so the backoff schedule can be checked under paused tokio time.

use async_trait::async_trait;
use groundfact_core::{QueryRequest, QueryResult, EMPTY_ANSWER_REASON, EXHAUSTED_REASON};
use groundfact_reasoning::api_types::{GenerateRequest, GenerateResponse};
use groundfact_reasoning::llm::{LlmClient, LlmError};
use groundfact_reasoning::retry::{InvokeFailure, RetryConfig};
use groundfact_reasoning::{invoke, query};
use serde_json::json;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

// ============================================================================
// Scripted client
// ============================================================================

struct ScriptedClient {
    outcomes: Mutex<Vec<Result<GenerateResponse, LlmError>>>,
    call_times: Mutex<Vec<Instant>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedClient {
    fn new(outcomes: Vec<Result<GenerateResponse, LlmError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            call_times: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn always_failing(n: usize) -> Self {
        Self::new((0..n).map(|_| Err(unavailable())).collect())
    }

    async fn calls(&self) -> usize {
        self.call_times.lock().await.len()
    }

    /// Gaps between consecutive calls, in whole seconds.
    async fn gaps(&self) -> Vec<u64> {
        let times = self.call_times.lock().await;
        times.windows(2).map(|w| (w[1] - w[0]).as_secs()).collect()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    async fn complete(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        self.call_times.lock().await.push(Instant::now());
        self.requests.lock().await.push(request.clone());
        let mut queue = self.outcomes.lock().await;
        if queue.is_empty() {
            Err(unavailable())
        } else {
            queue.remove(0)
        }
    }
}

fn unavailable() -> LlmError {
    LlmError::Status {
        provider: "Scripted",
        status: 503,
        body: "service unavailable".into(),
    }
}

fn unauthorized() -> LlmError {
    LlmError::Status {
        provider: "Scripted",
        status: 401,
        body: "API key not valid".into(),
    }
}

fn fact_x() -> GenerateResponse {
    serde_json::from_value(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": "Fact X"}]},
            "groundingMetadata": {
                "groundingAttributions": [
                    {"web": {"uri": "https://a.example", "title": "A"}}
                ]
            }
        }]
    }))
    .unwrap()
}

fn request() -> QueryRequest {
    QueryRequest::grounded("Give me one amazing fact.", "Be witty.").unwrap()
}

fn retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        base_delay: Duration::from_secs(1),
        retry_fatal: true,
    }
}

// ============================================================================
// Attempt counts and backoff schedule
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_permanent_failure_makes_exactly_n_attempts() {
    for n in 1..=5u32 {
        let client = ScriptedClient::always_failing(n as usize + 3);
        let result = invoke(&client, &request(), &retry(n)).await;

        assert_eq!(result, Err(InvokeFailure { attempts: n }));
        assert_eq!(client.calls().await, n as usize);

        let expected: Vec<u64> = (0..n.saturating_sub(1)).map(|a| 1u64 << a).collect();
        assert_eq!(client.gaps().await, expected, "max_attempts = {}", n);
    }
}

#[tokio::test(start_paused = true)]
async fn test_success_on_attempt_k_stops_retrying() {
    for k in 1..=5usize {
        let mut outcomes: Vec<_> = (1..k).map(|_| Err(unavailable())).collect();
        outcomes.push(Ok(fact_x()));
        outcomes.push(Err(unavailable()));
        let client = ScriptedClient::new(outcomes);

        let response = invoke(&client, &request(), &retry(5)).await.unwrap();
        assert_eq!(response, fact_x());
        assert_eq!(client.calls().await, k);
    }
}

#[tokio::test(start_paused = true)]
async fn test_three_failures_wait_one_then_two_seconds() {
    let client = ScriptedClient::always_failing(3);
    let start = Instant::now();

    let result = query(&client, &request(), &retry(3)).await;

    assert_eq!(result, QueryResult::failure(EXHAUSTED_REASON));
    assert_eq!(client.gaps().await, vec![1, 2]);
    assert!(start.elapsed() >= Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_two_failures_then_fact() {
    let client = ScriptedClient::new(vec![Err(unavailable()), Err(unavailable()), Ok(fact_x())]);

    let result = query(&client, &request(), &retry(5)).await;

    assert_eq!(client.calls().await, 3);
    match result {
        QueryResult::Success { answer_text, citations } => {
            assert_eq!(answer_text, "Fact X");
            assert_eq!(citations.len(), 1);
            assert_eq!(citations[0].uri, "https://a.example");
            assert_eq!(citations[0].title, "A");
        }
        other => panic!("expected success, got {:?}", other),
    }
}

// ============================================================================
// Error kinds and empty answers
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_fatal_errors_retried_by_default() {
    let client = ScriptedClient::new(vec![Err(unauthorized()), Ok(fact_x())]);
    let result = invoke(&client, &request(), &retry(5)).await;
    assert!(result.is_ok());
    assert_eq!(client.calls().await, 2);
}

#[tokio::test(start_paused = true)]
async fn test_fatal_error_stops_when_retry_fatal_disabled() {
    let client = ScriptedClient::new(vec![Err(unauthorized()), Ok(fact_x())]);
    let mut cfg = retry(5);
    cfg.retry_fatal = false;

    let result = invoke(&client, &request(), &cfg).await;

    assert_eq!(result, Err(InvokeFailure { attempts: 1 }));
    assert_eq!(client.calls().await, 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_response_is_not_retried() {
    let client = ScriptedClient::new(vec![Ok(GenerateResponse::default()), Ok(fact_x())]);

    let result = query(&client, &request(), &retry(5)).await;

    assert_eq!(client.calls().await, 1);
    assert_eq!(result, QueryResult::failure(EMPTY_ANSWER_REASON));
}

#[tokio::test(start_paused = true)]
async fn test_same_request_sent_on_every_attempt() {
    let client = ScriptedClient::new(vec![Err(unavailable()), Ok(fact_x())]);
    invoke(&client, &request(), &retry(5)).await.unwrap();

    let sent = client.requests.lock().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
    assert_eq!(sent[0].tools.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_invocations_are_independent() {
    let failing = ScriptedClient::always_failing(2);
    let succeeding = ScriptedClient::new(vec![Ok(fact_x())]);
    let req = request();
    let cfg = retry(2);

    let (a, b) = tokio::join!(
        invoke(&failing, &req, &cfg),
        invoke(&succeeding, &req, &cfg)
    );

    assert_eq!(a, Err(InvokeFailure { attempts: 2 }));
    assert!(b.is_ok());
    assert_eq!(succeeding.calls().await, 1);
}
