//! Conversation session state.
//!
//! Holds the identity sent with every request, the attributes carried over
//! from the previous response and the terminal "ended" flag.

use qlova_core::ids::IdentityGenerator;
use serde_json::{Map, Value};

use crate::response::ProcessedResponse;

/// Session continuity across request/response exchanges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub session_id: Option<String>,
    pub device_id: Option<String>,
    pub user_id: Option<String>,
    pub attributes: Map<String, Value>,
    pub ended: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate fresh session, device and user ids.
    pub fn new_session(&mut self, ids: &IdentityGenerator) {
        self.set_session_id(None, ids);
        self.set_device_id(None, ids);
        self.set_user_id(None, ids);
    }

    /// Set the session id, or generate a long-form one when `None`.
    pub fn set_session_id(&mut self, id: Option<String>, ids: &IdentityGenerator) {
        self.session_id = Some(non_empty(id).unwrap_or_else(|| ids.long_id()));
    }

    /// Set the device id, or generate a long-form one when `None`.
    pub fn set_device_id(&mut self, id: Option<String>, ids: &IdentityGenerator) {
        self.device_id = Some(non_empty(id).unwrap_or_else(|| ids.long_id()));
    }

    /// Set the user id, or generate a short-form one when `None`.
    pub fn set_user_id(&mut self, id: Option<String>, ids: &IdentityGenerator) {
        self.user_id = Some(non_empty(id).unwrap_or_else(|| ids.short_id()));
    }

    /// Drop carried attributes and reopen the session.
    pub fn reset(&mut self) {
        self.attributes.clear();
        self.ended = false;
    }

    /// Fold a processed response into the session.
    ///
    /// The end flag is overwritten when present. Attributes are adopted only
    /// while the session stays open; otherwise the previous ones are kept.
    pub fn apply(&mut self, response: &ProcessedResponse) {
        if let Some(ended) = response.should_end_session {
            self.ended = ended;
        }
        if self.ended {
            return;
        }
        if let Some(attributes) = &response.session_attributes {
            self.attributes = attributes.clone();
        }
    }
}

fn non_empty(id: Option<String>) -> Option<String> {
    id.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn processed(ended: Option<bool>, attributes: Option<Value>) -> ProcessedResponse {
        ProcessedResponse {
            messages: vec![],
            reprompt_messages: vec![],
            should_end_session: ended,
            session_attributes: attributes.map(attrs),
        }
    }

    #[test]
    fn test_new_session_generates_all_ids() {
        let mut state = SessionState::new();
        state.new_session(&IdentityGenerator::new());
        assert_eq!(state.session_id.as_ref().unwrap().len(), 36);
        assert_eq!(state.device_id.as_ref().unwrap().len(), 36);
        assert_eq!(state.user_id.as_ref().unwrap().len(), 22);
        assert_ne!(state.session_id, state.device_id);
    }

    #[test]
    fn test_explicit_ids_override_generation() {
        let ids = IdentityGenerator::new();
        let mut state = SessionState::new();
        state.set_session_id(Some("session-1".to_string()), &ids);
        state.set_device_id(Some("device-1".to_string()), &ids);
        state.set_user_id(Some("user-1".to_string()), &ids);
        assert_eq!(state.session_id.as_deref(), Some("session-1"));
        assert_eq!(state.device_id.as_deref(), Some("device-1"));
        assert_eq!(state.user_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn test_empty_explicit_id_is_generated() {
        let mut state = SessionState::new();
        state.set_user_id(Some(String::new()), &IdentityGenerator::new());
        assert_eq!(state.user_id.as_ref().unwrap().len(), 22);
    }

    #[test]
    fn test_apply_adopts_attributes_while_open() {
        let mut state = SessionState::new();
        state.apply(&processed(Some(false), Some(json!({"step": 1}))));
        assert_eq!(state.attributes, attrs(json!({"step": 1})));
        assert!(!state.ended);
    }

    #[test]
    fn test_apply_keeps_attributes_when_omitted() {
        let mut state = SessionState::new();
        state.apply(&processed(None, Some(json!({"step": 1}))));
        state.apply(&processed(None, None));
        assert_eq!(state.attributes, attrs(json!({"step": 1})));
    }

    #[test]
    fn test_apply_ignores_attributes_when_ending() {
        let mut state = SessionState::new();
        state.apply(&processed(None, Some(json!({"step": 1}))));
        state.apply(&processed(Some(true), Some(json!({"step": 2}))));
        assert!(state.ended);
        assert_eq!(state.attributes, attrs(json!({"step": 1})));
    }

    #[test]
    fn test_end_flag_is_overwritten_not_ored() {
        let mut state = SessionState::new();
        state.ended = true;
        state.apply(&processed(Some(false), None));
        assert!(!state.ended);
    }

    #[test]
    fn test_absent_end_flag_keeps_state() {
        let mut state = SessionState::new();
        state.apply(&processed(None, None));
        assert!(!state.ended);
    }

    #[test]
    fn test_reset_clears_attributes_and_end_flag() {
        let mut state = SessionState::new();
        state.attributes = attrs(json!({"a": true}));
        state.ended = true;
        state.reset();
        assert!(state.attributes.is_empty());
        assert!(!state.ended);
    }
}
