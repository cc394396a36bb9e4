// ABOUTME: HTTP server assembly and lifecycle for the notification relay
// ABOUTME: Builds the router, binds the listener, and shuts down on SIGTERM or Ctrl-C
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server assembly
//!
//! [`build_app`] returns the complete router so integration tests can serve
//! it on an ephemeral port. [`RelayServer`] adds the relay event loop,
//! listener binding, and graceful shutdown for the binary.

use crate::config::ServerConfig;
use crate::middleware::{
    create_request_span, propagate_request_id_layer, set_request_id_layer, setup_cors,
};
use crate::relay::{RelayHandle, RelayHub};
use crate::resources::RelayResources;
use crate::routes::{HealthRoutes, NotificationRoutes, WebSocketRoutes};
use anyhow::{Context, Result};
use axum::Router;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Assemble every route group with request tracing, correlation IDs, and CORS
#[must_use]
pub fn build_app(config: ServerConfig, relay: RelayHandle) -> Router {
    let cors = setup_cors(&config.cors);
    let resources = RelayResources::new(config, relay);

    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(NotificationRoutes::routes(resources.clone()))
        .merge(WebSocketRoutes::routes(resources))
        .layer(TraceLayer::new_for_http().make_span_with(create_request_span))
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
        .layer(cors)
}

/// Serve `app` on `listener` until `shutdown` resolves
///
/// # Errors
///
/// Returns an error if the server fails while accepting connections.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server terminated unexpectedly")
}

/// The relay process: event loop plus HTTP/WebSocket listener
pub struct RelayServer {
    config: ServerConfig,
}

impl RelayServer {
    /// Create a server for `config`
    #[must_use]
    pub const fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Run until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn run(self) -> Result<()> {
        let address = self.config.bind_address();
        let (relay, relay_task) = RelayHub::spawn(self.config.relay.buffer_policy());
        let app = build_app(self.config, relay);

        let listener = TcpListener::bind(address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;
        info!(%address, "Notification relay listening");

        serve(listener, app, wait_for_shutdown_signal()).await?;

        // Upgraded sockets may still hold relay handles; stop the loop directly
        relay_task.abort();
        info!("Notification relay shut down");
        Ok(())
    }
}

/// Resolve on SIGTERM or SIGINT (Ctrl-C elsewhere)
pub async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                }
            }
            _ => {
                warn!("Unix signal handlers unavailable, falling back to Ctrl-C");
                ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
