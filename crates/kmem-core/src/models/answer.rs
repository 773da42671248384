//! Answers produced by `POST /ask`.

use std::fmt;
use std::str::FromStr;

use crate::codec::{Timestamp, WireCodec};
use crate::error::{DecodeError, Result};
use crate::models::citation::Citation;
use crate::optional::Optional;
use crate::resolver::OrRaw;
use crate::wire::WireValue;
use crate::wire_model;

/// Position of an answer chunk within a streamed reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamState {
    Append,
    Error,
    Last,
    Reset,
}

impl StreamState {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamState::Append => "append",
            StreamState::Error => "error",
            StreamState::Last => "last",
            StreamState::Reset => "reset",
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamState {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "append" => Ok(StreamState::Append),
            "error" => Ok(StreamState::Error),
            "last" => Ok(StreamState::Last),
            "reset" => Ok(StreamState::Reset),
            other => Err(DecodeError::unknown_variant(other)),
        }
    }
}

impl WireCodec for StreamState {
    fn to_wire(&self) -> WireValue {
        WireValue::String(self.as_str().to_string())
    }

    fn from_wire(value: WireValue) -> Result<Self> {
        match value {
            WireValue::String(s) => s.parse(),
            other => Err(DecodeError::invalid_type("string", &other)),
        }
    }
}

wire_model! {
    /// Token accounting for one model call made while answering.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TokenUsage {
        pub timestamp: Optional<Timestamp> => "timestamp",
        pub service_type: Optional<String> => "serviceType",
        pub model_type: Optional<String> => "modelType",
        pub model_name: Optional<String> => "modelName",
        pub tokenizer_tokens_in: Optional<i64> => "tokenizerTokensIn",
        pub tokenizer_tokens_out: Optional<i64> => "tokenizerTokensOut",
        pub service_tokens_in: Optional<i64> => "serviceTokensIn",
        pub service_tokens_out: Optional<i64> => "serviceTokensOut",
        pub service_reasoning_tokens: Optional<i64> => "serviceReasoningTokens",
    }
}

wire_model! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct MemoryAnswer {
        pub stream_state: Optional<StreamState> => "streamState",
        pub question: Optional<String> => "question",
        pub no_result: Optional<bool> => "noResult",
        pub no_result_reason: Optional<String> => "noResultReason",
        pub text: Optional<String> => "text",
        pub token_usage: Optional<OrRaw<Vec<TokenUsage>>> => "tokenUsage",
        pub relevant_sources: Optional<OrRaw<Vec<Citation>>> => "relevantSources",
    }
}

impl MemoryAnswer {
    pub fn sources(&self) -> &[Citation] {
        match &self.relevant_sources {
            Optional::Present(OrRaw::Typed(sources)) => sources,
            _ => &[],
        }
    }

    pub fn usage(&self) -> &[TokenUsage] {
        match &self.token_usage {
            Optional::Present(OrRaw::Typed(usage)) => usage,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use serde_json::json;

    #[test]
    fn test_stream_state_strings() {
        for state in [
            StreamState::Append,
            StreamState::Error,
            StreamState::Last,
            StreamState::Reset,
        ] {
            assert_eq!(state.to_string().parse::<StreamState>().unwrap(), state);
        }
    }

    #[test]
    fn test_unknown_stream_state_is_error() {
        let err = MemoryAnswer::decode(json!({"streamState": "paused"})).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownVariant {
                path: "streamState".to_string(),
                value: "paused".to_string(),
            }
        );
    }

    #[test]
    fn test_answer_with_sources_and_usage() {
        let answer = MemoryAnswer::decode(json!({
            "streamState": "last",
            "question": "What is KM?",
            "noResult": false,
            "text": "A memory service.",
            "tokenUsage": [{
                "timestamp": "2024-05-01T10:00:00+00:00",
                "serviceType": "Azure OpenAI",
                "modelType": "TextGeneration",
                "modelName": "gpt-4o",
                "tokenizerTokensIn": 120,
                "serviceTokensOut": 12
            }],
            "relevantSources": [{"documentId": "doc-1", "partitions": []}]
        }))
        .unwrap();

        assert_eq!(answer.stream_state, Optional::Present(StreamState::Last));
        assert_eq!(answer.usage()[0].tokenizer_tokens_in, Optional::Present(120));
        assert!(answer.usage()[0].service_reasoning_tokens.is_absent());
        assert_eq!(answer.sources().len(), 1);
        assert_eq!(MemoryAnswer::decode(answer.encode()).unwrap(), answer);
    }

    #[test]
    fn test_no_result_reason() {
        let answer = MemoryAnswer::decode(json!({
            "noResult": true,
            "noResultReason": "No relevant memories found",
            "relevantSources": null
        }))
        .unwrap();
        assert!(answer.relevant_sources.is_null());
        assert!(answer.sources().is_empty());
    }
}
