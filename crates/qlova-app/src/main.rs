//! Qlova binary - composition root.
//!
//! 1. Parse CLI arguments and load the TOML configuration
//! 2. Install the tracing subscriber (stderr, so stdout stays a transcript)
//! 3. Build and validate the conversation client
//! 4. Run the interactive prompt or the scripted sample

mod cli;
mod runner;

use clap::Parser;
use qlova_client::ClientBuilder;
use qlova_core::config::QlovaConfig;

use crate::cli::{CliArgs, Mode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config is read before tracing starts so its log level can apply.
    let config_file = args.resolve_config_path();
    let loaded = config_file
        .exists()
        .then(|| QlovaConfig::load(&config_file));
    let file_level = match &loaded {
        Some(Ok(config)) => config.general.log_level.clone(),
        _ => "info".to_string(),
    };

    // Tracing. Priority: --log-level > RUST_LOG > config file.
    let filter = match args.resolve_log_level() {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(file_level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting qlova v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match loaded {
        Some(Ok(config)) => {
            tracing::info!(path = %config_file.display(), "Configuration loaded");
            config
        }
        Some(Err(e)) => {
            tracing::error!(
                path = %config_file.display(),
                error = %e,
                "Failed to load configuration"
            );
            return Err(e.into());
        }
        None => {
            tracing::info!(path = %config_file.display(), "No configuration file, using defaults");
            QlovaConfig::default()
        }
    };
    args.apply_overrides(&mut config);

    let mode = args.mode();
    let mut builder = ClientBuilder::from_config(&config);
    if mode == Mode::Sample && config.intents.is_empty() {
        builder = runner::with_demo_intents(builder);
    }

    let mut client = match builder.build() {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "Invalid client configuration");
            tracing::error!("Set them in qlova.toml or pass --endpoint / --application-id");
            return Err(e.into());
        }
    };

    let mut stdout = std::io::stdout();
    let result = match mode {
        Mode::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            runner::run_interactive(&mut client, stdin, &mut stdout).await
        }
        Mode::Sample => {
            let utterances = &config.sample.utterances;
            runner::run_sample(&mut client, utterances, &mut stdout)
                .await
                .map(|_| ())
        }
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Conversation aborted");
        return Err(e.into());
    }

    Ok(())
}
