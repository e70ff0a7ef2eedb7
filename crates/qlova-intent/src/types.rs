//! Intent definitions, slots and match results.

use qlova_core::config::SlotConfig;
use regex::Regex;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::error::IntentError;

// =============================================================================
// Slot specification
// =============================================================================

/// Where a slot's value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    /// Always this literal, whatever the utterance captured.
    Fixed(String),
    /// The text of the capture group at the slot's position.
    Capture,
}

/// A declared slot: its name and value source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSpec {
    pub name: String,
    pub value: SlotValue,
}

impl SlotSpec {
    pub fn capture(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SlotValue::Capture,
        }
    }

    pub fn fixed(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: SlotValue::Fixed(value.into()),
        }
    }

    /// The literal value, if any. An empty literal counts as "derive from capture".
    pub fn fixed_value(&self) -> Option<&str> {
        match &self.value {
            SlotValue::Fixed(v) if !v.is_empty() => Some(v.as_str()),
            _ => None,
        }
    }
}

impl From<&SlotConfig> for SlotSpec {
    fn from(config: &SlotConfig) -> Self {
        match &config.value {
            Some(v) => SlotSpec::fixed(config.name.clone(), v.clone()),
            None => SlotSpec::capture(config.name.clone()),
        }
    }
}

// =============================================================================
// IntentDefinition
// =============================================================================

/// A registered intent: name, compiled pattern and slots in capture order.
#[derive(Debug, Clone)]
pub struct IntentDefinition {
    pub name: String,
    /// Source pattern as registered.
    pub pattern: String,
    /// Compiled, anchored to the whole utterance.
    pub regex: Regex,
    pub slots: Vec<SlotSpec>,
}

impl IntentDefinition {
    /// Compile a definition. The pattern must match the whole utterance.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        slots: Vec<SlotSpec>,
    ) -> Result<Self, IntentError> {
        let name = name.into();
        let regex = Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
            IntentError::InvalidPattern {
                intent: name.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            name,
            pattern: pattern.to_string(),
            regex,
            slots,
        })
    }

    /// Number of capturing groups, not counting the whole match.
    pub fn capture_groups(&self) -> usize {
        self.regex.captures_len() - 1
    }
}

// =============================================================================
// Match results
// =============================================================================

/// A slot value extracted for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub name: String,
    pub value: String,
}

/// The intent chosen for an utterance, with slots in declaration order.
///
/// Serializes as `{"name": ..., "slots": {slotName: {"name", "value"}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedIntent {
    pub name: String,
    #[serde(serialize_with = "serialize_slots")]
    pub slots: Vec<Slot>,
}

impl MatchedIntent {
    /// The payload sent upstream when no definition matched.
    pub fn unmatched() -> Self {
        Self {
            name: String::new(),
            slots: Vec::new(),
        }
    }

    pub fn slot(&self, name: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.value.as_str())
    }
}

fn serialize_slots<S: Serializer>(slots: &[Slot], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(slots.len()))?;
    for slot in slots {
        map.serialize_entry(&slot.name, slot)?;
    }
    map.end()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_value_ignores_empty_literal() {
        assert_eq!(SlotSpec::fixed("me", "僕").fixed_value(), Some("僕"));
        assert_eq!(SlotSpec::fixed("me", "").fixed_value(), None);
        assert_eq!(SlotSpec::capture("me").fixed_value(), None);
    }

    #[test]
    fn test_slot_spec_from_config() {
        let derived = SlotSpec::from(&SlotConfig {
            name: "month".to_string(),
            value: None,
        });
        assert_eq!(derived, SlotSpec::capture("month"));

        let fixed = SlotSpec::from(&SlotConfig {
            name: "me".to_string(),
            value: Some("僕".to_string()),
        });
        assert_eq!(fixed, SlotSpec::fixed("me", "僕"));
    }

    #[test]
    fn test_definition_counts_capture_groups() {
        let def = IntentDefinition::new("BirthDayIntent", r"(\d+)/(\d+)", vec![]).unwrap();
        assert_eq!(def.capture_groups(), 2);

        let def = IntentDefinition::new("Plain", "hello", vec![]).unwrap();
        assert_eq!(def.capture_groups(), 0);
    }

    #[test]
    fn test_definition_rejects_bad_pattern() {
        let err = IntentDefinition::new("Broken", "(unclosed", vec![]).unwrap_err();
        assert!(matches!(
            err,
            IntentError::InvalidPattern { ref intent, .. } if intent == "Broken"
        ));
    }

    #[test]
    fn test_matched_intent_serializes_slots_as_map() {
        let intent = MatchedIntent {
            name: "BirthDayIntent".to_string(),
            slots: vec![
                Slot {
                    name: "month".to_string(),
                    value: "9".to_string(),
                },
                Slot {
                    name: "day".to_string(),
                    value: "21".to_string(),
                },
            ],
        };
        let value = serde_json::to_value(&intent).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "BirthDayIntent",
                "slots": {
                    "month": {"name": "month", "value": "9"},
                    "day": {"name": "day", "value": "21"}
                }
            })
        );
    }

    #[test]
    fn test_unmatched_serializes_empty() {
        let value = serde_json::to_value(MatchedIntent::unmatched()).unwrap();
        assert_eq!(value, json!({"name": "", "slots": {}}));
    }

    #[test]
    fn test_slot_lookup() {
        let intent = MatchedIntent {
            name: "X".to_string(),
            slots: vec![Slot {
                name: "menu".to_string(),
                value: "ramen".to_string(),
            }],
        };
        assert_eq!(intent.slot("menu"), Some("ramen"));
        assert_eq!(intent.slot("other"), None);
    }
}
