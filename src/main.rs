//! SwitchBot Panel - local control panel for SwitchBot devices
//!
//! Reads credentials and devices from `config.json`, serves one ON/OFF
//! panel per device, and sends signed commands to the SwitchBot Cloud API.

mod api;
mod config;
mod dispatch;
mod error;
mod switchbot;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::PanelState;
use crate::config::Config;
use crate::dispatch::{Action, Panel};
use crate::switchbot::SwitchBotClient;

/// SwitchBot Panel - toggle SwitchBot devices from a local web page
#[derive(Parser)]
#[command(name = "switchbot-panel", version, about)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(
        short,
        long,
        env = "SWITCHBOT_CONFIG",
        default_value = config::DEFAULT_CONFIG_PATH,
        global = true
    )]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the control panel (default)
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Send a single command and print the outcome
    Send {
        /// Device name or deviceId from the configuration file
        device: String,
        /// "on" or "off"
        action: Action,
    },
    /// List devices registered on the SwitchBot account
    Devices,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchbot_panel=info,tower_http=debug".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(&cli.config, port).await,
        Command::Send { device, action } => send(&cli.config, &device, action).await,
        Command::Devices => list_account_devices(&cli.config).await,
    }
}

fn build_client(config: &Config) -> anyhow::Result<SwitchBotClient> {
    let client = SwitchBotClient::new(config.credentials(), &config.api_base_url)
        .context("Failed to create HTTP client")?;
    tracing::debug!("Using SwitchBot API at {}", client.base_url());
    Ok(client)
}

async fn serve(config_path: &Path, port: Option<u16>) -> anyhow::Result<()> {
    tracing::info!("Starting SwitchBot Panel...");

    let (app, host, port) = match Config::load(config_path) {
        Ok(config) => {
            tracing::info!("Configuration loaded: {} device(s)", config.devices.len());

            let client = Arc::new(build_client(&config)?);
            let panel = Panel::new(&config.devices, client);
            let port = port.unwrap_or(config.server.port);

            (
                api::routes(PanelState::new(panel)),
                config.server.host,
                port,
            )
        }
        Err(e) => {
            // Keep serving so the message is visible in the browser
            tracing::error!("{}", e);
            let defaults = config::ServerConfig::default();
            (
                api::config_error_routes(e.to_string()),
                defaults.host,
                port.unwrap_or(defaults.port),
            )
        }
    };

    let app = app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    tracing::info!("Panel available at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn send(config_path: &Path, device: &str, action: Action) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    let client = Arc::new(build_client(&config)?);
    let panel = Panel::new(&config.devices, client);

    let dispatcher = panel
        .find(device)
        .with_context(|| format!("No device named '{}' in {}", device, config_path.display()))?;

    // A failed dispatch surfaces as the process error so the exit code is non-zero
    let message = dispatcher.execute(action).await?;
    println!("{}", message);

    Ok(())
}

async fn list_account_devices(config_path: &Path) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    let client = build_client(&config)?;

    let listing = client
        .list_devices()
        .await
        .context("Failed to list SwitchBot devices")?;

    for device in &listing.device_list {
        println!(
            "{}\t{}\t{}",
            device.device_id,
            device.device_name,
            device.device_type.as_deref().unwrap_or("-")
        );
    }
    for remote in &listing.infrared_remote_list {
        println!(
            "{}\t{}\t{} (IR)",
            remote.device_id,
            remote.device_name,
            remote.remote_type.as_deref().unwrap_or("-")
        );
    }

    tracing::info!(
        "{} device(s), {} IR remote(s)",
        listing.device_list.len(),
        listing.infrared_remote_list.len()
    );

    Ok(())
}
