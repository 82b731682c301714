//! Retry driver with fixed-step exponential backoff.
//!
//! Waits `base_delay * 2^attempt` between attempts, attempt counted from 0.
//! No jitter. By default every error is retried; with `retry_fatal = false`
//! only transient errors are.

use crate::llm::{ErrorKind, LlmError};
use groundfact_core::RetrySettings;
use std::future::Future;
use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first). Zero behaves as one.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each retry after it.
    pub base_delay: Duration,
    /// Also retry errors classified as fatal.
    pub retry_fatal: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&RetrySettings::default())
    }
}

impl From<&RetrySettings> for RetryConfig {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_attempts: settings.max_attempts,
            base_delay: Duration::from_millis(settings.base_delay_ms),
            retry_fatal: settings.retry_fatal,
        }
    }
}

impl RetryConfig {
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    /// Wait after the failed attempt with zero-based index `attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Every wait a permanently failing invocation goes through.
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.attempts() - 1).map(|a| self.delay_for(a)).collect()
    }
}

/// All attempts failed. Carries no detail of the underlying errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("all {attempts} attempt(s) failed")]
pub struct InvokeFailure {
    pub attempts: u32,
}

/// Lifecycle of one invocation. `attempt` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeState {
    Idle,
    Attempting { attempt: u32 },
    WaitingBackoff { attempt: u32, delay: Duration },
    Succeeded { attempts: u32 },
    ExhaustedFailed { attempts: u32 },
}

impl InvokeState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            InvokeState::Succeeded { .. } | InvokeState::ExhaustedFailed { .. }
        )
    }

    /// Attempts made so far.
    pub fn attempts(&self) -> u32 {
        match *self {
            InvokeState::Idle => 0,
            InvokeState::Attempting { attempt } => attempt,
            InvokeState::WaitingBackoff { attempt, .. } => attempt + 1,
            InvokeState::Succeeded { attempts } | InvokeState::ExhaustedFailed { attempts } => {
                attempts
            }
        }
    }

    // Transitions below leave any state they don't apply to unchanged.

    pub fn begin(self) -> Self {
        match self {
            InvokeState::Idle => InvokeState::Attempting { attempt: 0 },
            other => other,
        }
    }

    pub fn on_success(self) -> Self {
        match self {
            InvokeState::Attempting { attempt } => InvokeState::Succeeded {
                attempts: attempt + 1,
            },
            other => other,
        }
    }

    pub fn on_failure(self, kind: ErrorKind, config: &RetryConfig) -> Self {
        match self {
            InvokeState::Attempting { attempt } => {
                let attempts = attempt + 1;
                let retryable = kind == ErrorKind::Transient || config.retry_fatal;
                if retryable && attempts < config.attempts() {
                    InvokeState::WaitingBackoff {
                        attempt,
                        delay: config.delay_for(attempt),
                    }
                } else {
                    InvokeState::ExhaustedFailed { attempts }
                }
            }
            other => other,
        }
    }

    pub fn on_backoff_elapsed(self) -> Self {
        match self {
            InvokeState::WaitingBackoff { attempt, .. } => InvokeState::Attempting {
                attempt: attempt + 1,
            },
            other => other,
        }
    }
}

/// Execute an async operation with retry logic.
///
/// `operation` receives the zero-based attempt index. The first `Ok` is
/// returned as is. Each failure is logged with its attempt number; the error
/// itself is not returned.
pub async fn with_retry<T, F, Fut>(
    config: &RetryConfig,
    provider_name: &str,
    mut operation: F,
) -> Result<T, InvokeFailure>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let max = config.attempts();
    let mut state = InvokeState::Idle;
    let mut value = None;

    while !state.is_terminal() {
        state = match state {
            InvokeState::Idle => state.begin(),
            InvokeState::Attempting { attempt } => {
                tracing::info!("Attempting {} call (attempt {}/{})", provider_name, attempt + 1, max);
                match operation(attempt).await {
                    Ok(v) => {
                        tracing::info!("{} call succeeded on attempt {}", provider_name, attempt + 1);
                        value = Some(v);
                        state.on_success()
                    }
                    Err(e) => {
                        tracing::warn!(
                            "{} call failed on attempt {}/{} ({:?}): {}",
                            provider_name,
                            attempt + 1,
                            max,
                            e.kind(),
                            e
                        );
                        state.on_failure(e.kind(), config)
                    }
                }
            }
            InvokeState::WaitingBackoff { attempt, delay } => {
                tracing::info!(
                    "Waiting {:.1}s before retrying {} (attempt {}/{})",
                    delay.as_secs_f64(),
                    provider_name,
                    attempt + 2,
                    max
                );
                tokio::time::sleep(delay).await;
                state.on_backoff_elapsed()
            }
            terminal => terminal,
        };
    }

    match (state, value) {
        (InvokeState::Succeeded { .. }, Some(v)) => Ok(v),
        (state, _) => {
            tracing::error!(
                "{} call gave up after {} attempt(s)",
                provider_name,
                state.attempts()
            );
            Err(InvokeFailure {
                attempts: state.attempts(),
            })
        }
    }
}
