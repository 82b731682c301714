//! Mock LLM Provider — deterministic responses for testing without API keys.

use crate::api_types::{
    Candidate, Content, GenerateRequest, GenerateResponse, GroundingChunk, GroundingMetadata, Part,
    WebSource,
};
use crate::llm::{LlmClient, LlmError};
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Debug)]
pub struct MockProvider {
    model: String,
    /// Number of leading calls that fail with a 503 before answers start.
    failures_before_success: u32,
    calls: AtomicU32,
}

impl MockProvider {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            failures_before_success: 0,
            calls: AtomicU32::new(0),
        }
    }

    pub fn with_failures(mut self, failures: u32) -> Self {
        self.failures_before_success = failures;
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// A grounded answer with a single source.
    pub fn canned_response(model: &str) -> GenerateResponse {
        GenerateResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts: vec![Part::text(&format!(
                        "(Mock {} Response) Hello! Here is a fact: the Voyager 1 probe is still sending data from interstellar space.",
                        model
                    ))],
                }),
                finish_reason: Some("STOP".to_string()),
                grounding_metadata: Some(GroundingMetadata {
                    grounding_chunks: vec![GroundingChunk {
                        web: Some(WebSource {
                            uri: Some("https://science.nasa.gov/mission/voyager/".to_string()),
                            title: Some("Voyager - NASA Science".to_string()),
                        }),
                    }],
                    ..GroundingMetadata::default()
                }),
            }],
            model_version: Some(model.to_string()),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for MockProvider {
    fn name(&self) -> &'static str {
        "Mock"
    }

    async fn complete(&self, _request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures_before_success {
            return Err(LlmError::Status {
                provider: "Mock",
                status: 503,
                body: format!("simulated outage ({} of {})", call + 1, self.failures_before_success),
            });
        }
        Ok(Self::canned_response(&self.model))
    }
}
