pub mod config;
pub mod query;

pub use config::{ApiKey, GroundfactConfig, LlmConfig, PromptConfig, RetrySettings, ServerConfig};
pub use query::{
    Citation, QueryError, QueryRequest, QueryResult, ToolCapability, EMPTY_ANSWER_REASON,
    EXHAUSTED_REASON,
};
