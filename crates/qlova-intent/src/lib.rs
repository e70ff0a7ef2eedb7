//! Intent matching for typed utterances.
//!
//! Keeps an ordered registry of intent definitions (built-ins first) and
//! turns free text into an intent name plus slot values.

pub mod error;
pub mod matcher;
pub mod registry;
pub mod types;

pub use error::IntentError;
pub use matcher::IntentMatcher;
pub use registry::IntentRegistry;
pub use types::{IntentDefinition, MatchedIntent, Slot, SlotSpec, SlotValue};
