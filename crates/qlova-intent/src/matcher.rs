//! Regex-based intent matching.
//!
//! Walks the registry in registration order and returns the first
//! definition whose pattern matches the whole utterance. Slots bind to
//! capture groups by position: the first slot to group 1, the second to
//! group 2, and so on.

use crate::error::IntentError;
use crate::registry::IntentRegistry;
use crate::types::{IntentDefinition, MatchedIntent, Slot};

/// Matches free text against an [`IntentRegistry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentMatcher;

impl IntentMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Find the first definition matching `text` and extract its slots.
    ///
    /// `Ok(None)` means nothing matched, which is not an error.
    pub fn match_intent(
        &self,
        text: &str,
        registry: &IntentRegistry,
    ) -> Result<Option<MatchedIntent>, IntentError> {
        for definition in registry.definitions() {
            if let Some(intent) = Self::try_definition(text, definition)? {
                tracing::debug!(
                    intent = %intent.name,
                    slots = intent.slots.len(),
                    "Intent matched"
                );
                return Ok(Some(intent));
            }
        }
        tracing::debug!(text = %text, "No intent matched");
        Ok(None)
    }

    fn try_definition(
        text: &str,
        definition: &IntentDefinition,
    ) -> Result<Option<MatchedIntent>, IntentError> {
        let Some(caps) = definition.regex.captures(text) else {
            return Ok(None);
        };

        let mut slots = Vec::with_capacity(definition.slots.len());
        // Group 0 is the whole match.
        for (idx, spec) in definition.slots.iter().enumerate() {
            let group = idx + 1;
            if let Some(value) = spec.fixed_value() {
                slots.push(Slot {
                    name: spec.name.clone(),
                    value: value.to_string(),
                });
                continue;
            }
            if group > definition.capture_groups() {
                return Err(IntentError::MissingCaptureGroup {
                    intent: definition.name.clone(),
                    group,
                });
            }
            // A group that did not participate yields no slot at all.
            if let Some(m) = caps.get(group) {
                slots.push(Slot {
                    name: spec.name.clone(),
                    value: m.as_str().to_string(),
                });
            }
        }

        Ok(Some(MatchedIntent {
            name: definition.name.clone(),
            slots,
        }))
    }
}
