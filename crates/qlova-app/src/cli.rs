//! CLI argument definitions for the `qlova` binary.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use qlova_core::config::QlovaConfig;

/// Qlova: drive a voice-skill extension from the terminal.
#[derive(Parser, Debug)]
#[command(name = "qlova", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Extension endpoint URL.
    #[arg(short = 'e', long = "endpoint")]
    pub endpoint: Option<String>,

    /// Application (extension) id.
    #[arg(short = 'a', long = "application-id")]
    pub application_id: Option<String>,

    /// Extra request header, repeatable.
    #[arg(long = "debug-header", value_name = "NAME=VALUE", value_parser = parse_header)]
    pub debug_headers: Vec<(String, String)>,

    /// Log matched intents and full request/response objects.
    #[arg(long = "debug")]
    pub debug: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

/// How the conversation is driven.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Read utterances from standard input (default).
    Interactive,
    /// Send the configured sample utterances and exit.
    Sample,
}

impl CliArgs {
    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or(Mode::Interactive)
    }

    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > QLOVA_CONFIG env var > ./qlova.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("QLOVA_CONFIG") {
            return PathBuf::from(p);
        }
        PathBuf::from("qlova.toml")
    }

    /// Resolve the debug flag.
    ///
    /// Priority: --debug flag > DEBUG env var > config file value.
    pub fn resolve_debug(&self, config_debug: bool) -> bool {
        if self.debug {
            return true;
        }
        if let Ok(val) = std::env::var("DEBUG") {
            return is_truthy(&val);
        }
        config_debug
    }

    /// Resolve the log level.
    ///
    /// Returns `None` if not overridden on the command line.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }

    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut QlovaConfig) {
        if let Some(ref endpoint) = self.endpoint {
            config.extension.endpoint = Some(endpoint.clone());
        }
        if let Some(ref id) = self.application_id {
            config.extension.application_id = Some(id.clone());
        }
        for (name, value) in &self.debug_headers {
            config
                .extension
                .debug_headers
                .insert(name.clone(), value.clone());
        }
        config.general.debug = self.resolve_debug(config.general.debug);
        if let Some(level) = self.resolve_log_level() {
            config.general.log_level = level;
        }
    }
}

fn is_truthy(val: &str) -> bool {
    !val.is_empty() && val != "0" && !val.eq_ignore_ascii_case("false")
}

/// Parse `NAME=VALUE`. A bare `NAME` gets the value `true`.
fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = match raw.split_once('=') {
        Some((name, value)) => (name.trim(), value.trim()),
        None => (raw.trim(), "true"),
    };
    if name.is_empty() {
        return Err(format!("invalid header '{}': empty name", raw));
    }
    Ok((name.to_string(), value.to_string()))
}
