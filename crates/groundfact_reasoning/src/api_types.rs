//! Wire types for the Gemini `generateContent` REST endpoint.

use groundfact_core::{QueryRequest, ToolCapability};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: &str) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Set on reasoning summaries; these are not part of the answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            thought: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
    #[serde(rename = "google_search", skip_serializing_if = "Option::is_none")]
    pub google_search: Option<GoogleSearch>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoogleSearch {}

impl From<ToolCapability> for Tool {
    fn from(capability: ToolCapability) -> Self {
        match capability {
            ToolCapability::GoogleSearch => Tool {
                google_search: Some(GoogleSearch {}),
            },
        }
    }
}

// Request payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

impl From<&QueryRequest> for GenerateRequest {
    fn from(request: &QueryRequest) -> Self {
        let system_instruction = if request.system_instruction().is_empty() {
            None
        } else {
            Some(Content {
                role: None,
                parts: vec![Part::text(request.system_instruction())],
            })
        };
        Self {
            system_instruction,
            contents: vec![Content::user_text(request.prompt())],
            tools: request.enabled_tools().iter().copied().map(Tool::from).collect(),
        }
    }
}

// Response payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_attributions: Vec<GroundingAttribution>,
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
    #[serde(default)]
    pub web_search_queries: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingAttribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let query = QueryRequest::grounded("One fact.", "Be witty.").unwrap();
        let body = serde_json::to_value(GenerateRequest::from(&query)).unwrap();
        assert_eq!(
            body,
            json!({
                "systemInstruction": {"parts": [{"text": "Be witty."}]},
                "contents": [{"role": "user", "parts": [{"text": "One fact."}]}],
                "tools": [{"google_search": {}}]
            })
        );
    }

    #[test]
    fn test_request_without_tools_or_system() {
        let query = QueryRequest::new("q", "", Vec::<ToolCapability>::new()).unwrap();
        let body = serde_json::to_value(GenerateRequest::from(&query)).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_response_decodes_grounding() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Fact X"}]},
                "finishReason": "STOP",
                "groundingMetadata": {
                    "webSearchQueries": ["ai news"],
                    "groundingChunks": [{"web": {"uri": "https://a.example", "title": "A"}}]
                }
            }],
            "modelVersion": "gemini-2.5-flash"
        });
        let resp: GenerateResponse = serde_json::from_value(raw).unwrap();
        let candidate = &resp.candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        let meta = candidate.grounding_metadata.as_ref().unwrap();
        assert!(meta.grounding_attributions.is_empty());
        assert_eq!(meta.grounding_chunks.len(), 1);
        assert_eq!(meta.web_search_queries, vec!["ai news".to_string()]);
    }

    #[test]
    fn test_empty_response_decodes() {
        let resp: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.candidates.is_empty());
    }
}
