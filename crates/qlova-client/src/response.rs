//! Interpretation of extension responses.
//!
//! Only four fields matter: spoken output, reprompt, the end-of-session
//! flag and top-level session attributes. Everything else is ignored.

use serde_json::{Map, Value};

/// What the simulator takes from one response envelope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessedResponse {
    pub messages: Vec<String>,
    pub reprompt_messages: Vec<String>,
    /// `response.shouldEndSession`, when present.
    pub should_end_session: Option<bool>,
    /// Top-level `sessionAttributes`, when present.
    pub session_attributes: Option<Map<String, Value>>,
}

/// Extracts messages and session signals from raw responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseProcessor;

impl ResponseProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, envelope: &Value) -> ProcessedResponse {
        let response = envelope.get("response").unwrap_or(&Value::Null);

        let reprompt_messages = response
            .get("reprompt")
            .map(Self::response_messages)
            .unwrap_or_default();

        let should_end_session = response.get("shouldEndSession").and_then(Value::as_bool);

        let session_attributes = match envelope.get("sessionAttributes") {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map.clone()),
            // Some servers encode an empty map as `[]`.
            Some(Value::Array(items)) if items.is_empty() => Some(Map::new()),
            Some(other) => {
                tracing::warn!(value = %other, "Ignoring non-object sessionAttributes");
                None
            }
        };

        ProcessedResponse {
            messages: Self::response_messages(response),
            reprompt_messages,
            should_end_session,
            session_attributes,
        }
    }

    /// Spoken messages from `outputSpeech.values`, in order.
    ///
    /// `values` is either a single speech object (it has a `type`) or a
    /// list of them.
    pub fn response_messages(response: &Value) -> Vec<String> {
        let Some(values) = response.get("outputSpeech").and_then(|o| o.get("values")) else {
            return Vec::new();
        };

        if values.get("type").is_some() {
            return speech_value(values).into_iter().collect();
        }

        match values {
            Value::Array(items) => items.iter().filter_map(speech_value).collect(),
            Value::Object(map) => map.values().filter_map(speech_value).collect(),
            _ => Vec::new(),
        }
    }
}

fn speech_value(speech: &Value) -> Option<String> {
    match speech.get("value")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn processor() -> ResponseProcessor {
        ResponseProcessor::new()
    }

    // ---- Message extraction ----

    #[test]
    fn test_single_speech_object() {
        let response = json!({"outputSpeech": {"values": {"type": "PlainText", "value": "Hi"}}});
        assert_eq!(ResponseProcessor::response_messages(&response), vec!["Hi"]);
    }

    #[test]
    fn test_speech_list_in_order() {
        let response = json!({"outputSpeech": {"values": [{"value": "A"}, {"value": "B"}]}});
        assert_eq!(
            ResponseProcessor::response_messages(&response),
            vec!["A", "B"]
        );
    }

    #[test]
    fn test_speech_list_with_types() {
        let response = json!({
            "outputSpeech": {
                "type": "SpeechList",
                "values": [
                    {"type": "PlainText", "lang": "ja", "value": "こんにちは"},
                    {"type": "URL", "lang": "", "value": "https://example.com/a.mp3"}
                ]
            }
        });
        assert_eq!(
            ResponseProcessor::response_messages(&response),
            vec!["こんにちは", "https://example.com/a.mp3"]
        );
    }

    #[test]
    fn test_missing_output_speech_yields_nothing() {
        assert!(ResponseProcessor::response_messages(&json!({})).is_empty());
        assert!(ResponseProcessor::response_messages(&json!({"outputSpeech": {}})).is_empty());
    }

    #[test]
    fn test_entries_without_value_are_skipped() {
        let response = json!({"outputSpeech": {"values": [{"type": "PlainText"}, {"value": "B"}]}});
        assert_eq!(ResponseProcessor::response_messages(&response), vec!["B"]);
    }

    // ---- Envelope processing ----

    #[test]
    fn test_process_full_envelope() {
        let envelope = json!({
            "version": "1.0",
            "sessionAttributes": {"step": 2},
            "response": {
                "outputSpeech": {"values": {"type": "PlainText", "value": "When is your birthday?"}},
                "reprompt": {"outputSpeech": {"values": {"type": "PlainText", "value": "Tell me your birthday."}}},
                "shouldEndSession": false
            }
        });
        let processed = processor().process(&envelope);
        assert_eq!(processed.messages, vec!["When is your birthday?"]);
        assert_eq!(processed.reprompt_messages, vec!["Tell me your birthday."]);
        assert_eq!(processed.should_end_session, Some(false));
        assert_eq!(
            processed.session_attributes,
            json!({"step": 2}).as_object().cloned()
        );
    }

    #[test]
    fn test_process_without_optional_fields() {
        let processed = processor().process(&json!({"response": {}}));
        assert_eq!(processed, ProcessedResponse::default());
    }

    #[test]
    fn test_process_missing_response_block() {
        let processed = processor().process(&json!({"version": "1.0"}));
        assert!(processed.messages.is_empty());
        assert!(processed.should_end_session.is_none());
    }

    #[test]
    fn test_session_attributes_only_read_at_top_level() {
        let envelope = json!({"response": {"sessionAttributes": {"nested": true}}});
        assert!(processor().process(&envelope).session_attributes.is_none());
    }

    #[test]
    fn test_empty_array_attributes_become_empty_map() {
        let envelope = json!({"sessionAttributes": [], "response": {}});
        assert_eq!(
            processor().process(&envelope).session_attributes,
            Some(Map::new())
        );
    }

    #[test]
    fn test_null_attributes_are_absent() {
        let envelope = json!({"sessionAttributes": null, "response": {}});
        assert!(processor().process(&envelope).session_attributes.is_none());
    }

    #[test]
    fn test_end_session_true() {
        let envelope = json!({"response": {"shouldEndSession": true}});
        assert_eq!(processor().process(&envelope).should_end_session, Some(true));
    }
}
