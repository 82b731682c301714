//! Single-cycle data model: one grounded query in, one result out.
//!
//! Nothing here outlives the HTTP request that created it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Reason attached to a result whose response carried no answer text.
pub const EMPTY_ANSWER_REASON: &str = "The model returned an empty answer.";

/// Reason attached to a result after every attempt failed. The underlying
/// error is logged, never surfaced.
pub const EXHAUSTED_REASON: &str =
    "Could not get a response from the Gemini API after multiple retries.";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("prompt must not be empty")]
    EmptyPrompt,
}

/// A remote capability the model may use while answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCapability {
    /// Web-search grounding performed by the remote service.
    GoogleSearch,
}

impl ToolCapability {
    pub fn id(&self) -> &'static str {
        match self {
            ToolCapability::GoogleSearch => "google_search",
        }
    }
}

/// An immutable grounded query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    prompt: String,
    system_instruction: String,
    enabled_tools: BTreeSet<ToolCapability>,
}

impl QueryRequest {
    pub fn new(
        prompt: impl Into<String>,
        system_instruction: impl Into<String>,
        tools: impl IntoIterator<Item = ToolCapability>,
    ) -> Result<Self, QueryError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QueryError::EmptyPrompt);
        }
        Ok(Self {
            prompt,
            system_instruction: system_instruction.into(),
            enabled_tools: tools.into_iter().collect(),
        })
    }

    /// A query with web-search grounding enabled.
    pub fn grounded(
        prompt: impl Into<String>,
        system_instruction: impl Into<String>,
    ) -> Result<Self, QueryError> {
        Self::new(prompt, system_instruction, [ToolCapability::GoogleSearch])
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn enabled_tools(&self) -> &BTreeSet<ToolCapability> {
        &self.enabled_tools
    }
}

/// A cited web source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    pub title: String,
}

impl Citation {
    /// Build a citation only when both fields are present and non-empty.
    pub fn from_parts(uri: Option<&str>, title: Option<&str>) -> Option<Self> {
        match (uri, title) {
            (Some(uri), Some(title)) if !uri.is_empty() && !title.is_empty() => {
                Some(Self {
                    uri: uri.to_string(),
                    title: title.to_string(),
                })
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    Success {
        answer_text: String,
        citations: Vec<Citation>,
    },
    Failure {
        reason: String,
    },
}

impl QueryResult {
    /// Blank answer text yields a `Failure` instead of an empty `Success`.
    pub fn success(answer_text: impl Into<String>, citations: Vec<Citation>) -> Self {
        let answer_text = answer_text.into();
        if answer_text.trim().is_empty() {
            return Self::failure(EMPTY_ANSWER_REASON);
        }
        Self::Success {
            answer_text,
            citations,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self::Failure {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn citations(&self) -> &[Citation] {
        match self {
            Self::Success { citations, .. } => citations,
            Self::Failure { .. } => &[],
        }
    }
}
