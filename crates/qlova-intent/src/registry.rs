//! Ordered intent registry.
//!
//! Built-in intents are seeded before anything else, so custom intents
//! are only consulted once the built-ins fail to match.

use crate::error::IntentError;
use crate::types::{IntentDefinition, SlotSpec};

/// Built-in intents with their single-letter shorthands for interactive use.
const BUILT_IN_INTENTS: [(&str, &str); 4] = [
    ("Clova.CancelIntent", "c|cancel|キャンセル"),
    ("Clova.GuideIntent", "h|help|ヘルプ"),
    ("Clova.YesIntent", "y|yes|はい"),
    ("Clova.NoIntent", "n|no|いいえ"),
];

/// Ordered collection of intent definitions. First registered wins.
#[derive(Debug, Clone)]
pub struct IntentRegistry {
    definitions: Vec<IntentDefinition>,
}

impl Default for IntentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentRegistry {
    /// Create a registry holding only the built-in intents.
    pub fn new() -> Self {
        let definitions = BUILT_IN_INTENTS
            .iter()
            .map(|(name, pattern)| {
                IntentDefinition::new(*name, pattern, Vec::new())
                    .expect("Invalid built-in intent regex")
            })
            .collect();
        Self { definitions }
    }

    /// Append an intent definition. Duplicate names coexist.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        pattern: &str,
        slots: Vec<SlotSpec>,
    ) -> Result<&mut Self, IntentError> {
        let definition = IntentDefinition::new(name, pattern, slots)?;
        self.push(definition);
        Ok(self)
    }

    fn push(&mut self, definition: IntentDefinition) {
        tracing::debug!(
            intent = %definition.name,
            pattern = %definition.pattern,
            slots = definition.slots.len(),
            "Intent registered"
        );
        self.definitions.push(definition);
    }

    /// Definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &IntentDefinition> {
        self.definitions.iter()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
