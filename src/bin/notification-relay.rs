// ABOUTME: Notification relay server binary
// ABOUTME: Parses CLI overrides, loads configuration, and runs the relay until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Notification Relay Binary
//!
//! Starts the in-memory notification relay with its HTTP and WebSocket
//! endpoints.

use anyhow::Result;
use clap::Parser;
use notification_relay::{
    config::ServerConfig,
    constants::endpoints,
    logging,
    server::RelayServer,
};
use std::net::IpAddr;
use tracing::{error, info};

/// Command-line overrides for the environment configuration
#[derive(Parser)]
#[command(name = "notification-relay")]
#[command(about = "Role-scoped real-time notification relay for the fire-safety permit app")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override listen address
    #[arg(long)]
    host: Option<IpAddr>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    info!("Starting notification relay");
    info!("{}", config.summary());
    display_available_endpoints(&config);

    if let Err(e) = RelayServer::new(config).run().await {
        error!("Server error: {e:#}");
        return Err(e);
    }

    Ok(())
}

/// Display all available endpoints
#[allow(clippy::cognitive_complexity)]
fn display_available_endpoints(config: &ServerConfig) {
    let address = config.bind_address();

    info!("=== Available Endpoints ===");
    info!("   Health Check:      GET  http://{address}{}", endpoints::HEALTH);
    info!("   Readiness:         GET  http://{address}{}", endpoints::READY);
    info!("   Stream:            GET  ws://{address}{}?role={{role}}", endpoints::WEBSOCKET);
    info!("   Publish:           POST http://{address}{}", endpoints::NOTIFICATIONS);
    info!("   Snapshot:          GET  http://{address}{}?role={{role}}", endpoints::NOTIFICATIONS);
    info!("   Stats:             GET  http://{address}{}", endpoints::NOTIFICATION_STATS);
    info!("=== End of Endpoint List ===");
}
