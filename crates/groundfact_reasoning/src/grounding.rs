//! Turning a raw generation response into a `QueryResult`.

use crate::api_types::GenerateResponse;
use groundfact_core::{Citation, QueryResult};

impl GenerateResponse {
    /// Answer text of the first candidate: every non-thought text part, joined.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought.unwrap_or(false))
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// Cited sources of the first candidate, in response order.
    ///
    /// Attributions come first, then grounding chunks. Entries missing a URI or
    /// a title are dropped.
    pub fn citations(&self) -> Vec<Citation> {
        let Some(meta) = self
            .candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
        else {
            return Vec::new();
        };

        let sources = meta
            .grounding_attributions
            .iter()
            .filter_map(|a| a.web.as_ref())
            .chain(meta.grounding_chunks.iter().filter_map(|c| c.web.as_ref()));

        sources
            .filter_map(|web| Citation::from_parts(web.uri.as_deref(), web.title.as_deref()))
            .collect()
    }
}

impl From<&GenerateResponse> for QueryResult {
    fn from(response: &GenerateResponse) -> Self {
        QueryResult::success(response.text(), response.citations())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundfact_core::EMPTY_ANSWER_REASON;
    use serde_json::json;

    fn decode(v: serde_json::Value) -> GenerateResponse {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_text_joins_parts_and_skips_thoughts() {
        let resp = decode(json!({
            "candidates": [{"content": {"parts": [
                {"text": "thinking...", "thought": true},
                {"text": "Fact "},
                {"text": "X"}
            ]}}]
        }));
        assert_eq!(resp.text(), "Fact X");
    }

    #[test]
    fn test_malformed_attributions_dropped() {
        let resp = decode(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Fact X"}]},
                "groundingMetadata": {
                    "groundingAttributions": [
                        {"web": {"uri": "https://a.example", "title": "A"}},
                        {"web": {"uri": "https://no-title.example"}},
                        {"web": {"title": "No URI"}},
                        {}
                    ],
                    "groundingChunks": [
                        {"web": {"uri": "https://b.example", "title": "B"}},
                        {"web": {"uri": "https://a.example", "title": "A again"}}
                    ]
                }
            }]
        }));
        let cites = resp.citations();
        assert_eq!(cites.len(), 3);
        assert_eq!(cites[0].uri, "https://a.example");
        assert_eq!(cites[0].title, "A");
        assert_eq!(cites[1].uri, "https://b.example");
        assert_eq!(cites[2].title, "A again");
    }

    #[test]
    fn test_no_metadata_means_no_citations() {
        let resp = decode(json!({"candidates": [{"content": {"parts": [{"text": "hi"}]}}]}));
        assert!(resp.citations().is_empty());
        let result = QueryResult::from(&resp);
        assert!(result.is_success());
    }

    #[test]
    fn test_empty_response_is_failure() {
        let result = QueryResult::from(&GenerateResponse::default());
        assert_eq!(result, QueryResult::failure(EMPTY_ANSWER_REASON));
    }
}
