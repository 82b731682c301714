pub mod api_types;
pub mod grounding;
pub mod invoker;
pub mod llm;
pub mod providers;
pub mod retry;

pub use invoker::{invoke, query};
pub use llm::{ErrorKind, LlmClient, LlmError};
pub use retry::{InvokeFailure, InvokeState, RetryConfig};
