use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;

/// Top-level configuration for the simulator.
///
/// Loaded from `qlova.toml` (or `--config`). Every section is optional; the
/// endpoint and application id are validated when the client is built, not
/// here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QlovaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub extension: ExtensionConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub intents: Vec<IntentConfig>,
    #[serde(default)]
    pub sample: SampleConfig,
}

impl QlovaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: QlovaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
    /// Dump every request, response and matched intent.
    pub debug: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            debug: false,
        }
    }
}

/// Extension server under test.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    /// Webhook endpoint receiving the simulated requests.
    pub endpoint: Option<String>,
    /// Application (extension) id embedded in every request.
    pub application_id: Option<String>,
    /// Headers the extension checks in place of a request signature.
    pub debug_headers: BTreeMap<String, String>,
    /// HTTP timeout per exchange.
    pub timeout_secs: u64,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            application_id: None,
            debug_headers: BTreeMap::new(),
            timeout_secs: 30,
        }
    }
}

/// Fixed session identity. Unset ids are generated randomly.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub session_id: Option<String>,
    pub device_id: Option<String>,
    pub user_id: Option<String>,
}

/// A custom intent as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntentConfig {
    pub name: String,
    pub pattern: String,
    /// Slots in capture-group order.
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

/// A slot entry. Without `value` the slot takes its capture group's text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlotConfig {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Utterances sent by the scripted sample mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub utterances: Vec<String>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            utterances: vec!["9/21".to_string(), "y".to_string(), "c".to_string()],
        }
    }
}
