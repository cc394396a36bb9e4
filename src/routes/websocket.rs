// ABOUTME: WebSocket route handler for the streaming relay channel
// ABOUTME: Resolves the connection role before upgrading and hands the socket to the session manager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::endpoints;
use crate::errors::AppError;
use crate::resources::RelayResources;
use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header::ORIGIN, HeaderMap},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Handshake parameters for `GET /ws`
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    /// Role hint selecting the initial snapshot
    #[serde(default)]
    pub role: Option<String>,
    /// Session token, required when role verification is enabled
    #[serde(default)]
    pub token: Option<String>,
}

/// WebSocket routes implementation
pub struct WebSocketRoutes;

impl WebSocketRoutes {
    /// Create the streaming endpoint
    pub fn routes(resources: RelayResources) -> Router {
        Router::new()
            .route(endpoints::WEBSOCKET, get(Self::handle_websocket))
            .with_state(resources)
    }

    /// Check the origin and resolve the connection identity, then upgrade
    ///
    /// Origin and verification failures are answered with a plain HTTP error
    /// before any upgrade happens, so rejected clients never receive a snapshot.
    async fn handle_websocket(
        ws: WebSocketUpgrade,
        headers: HeaderMap,
        Query(params): Query<ConnectParams>,
        State(resources): State<RelayResources>,
    ) -> Result<Response, AppError> {
        Self::check_origin(&resources, &headers)?;

        let role_hint = params.role.unwrap_or_default();
        let identity = resources
            .verifier
            .resolve(&role_hint, params.token.as_deref())?;

        info!(role_hint = %identity.role_hint, "New WebSocket connection request");

        let manager = resources.websocket.clone();
        Ok(ws
            .on_upgrade(move |socket: WebSocket| async move {
                debug!("WebSocket upgraded, delegating to manager");
                manager.handle_connection(socket, identity).await;
            })
            .into_response())
    }

    /// Browsers always send `Origin` on a `WebSocket` handshake; clients that
    /// omit it are not subject to cross-origin policy.
    fn check_origin(resources: &RelayResources, headers: &HeaderMap) -> Result<(), AppError> {
        let cors = &resources.config.cors;
        let Some(origin) = headers.get(ORIGIN) else {
            return Ok(());
        };

        let origin = origin
            .to_str()
            .map_err(|_| AppError::permission_denied("Origin header is not valid text"))?;
        if cors.allows_origin(origin) {
            return Ok(());
        }

        warn!(origin = %origin, "Refusing WebSocket connection from disallowed origin");
        Err(AppError::permission_denied(format!(
            "Origin {origin} is not allowed"
        )))
    }
}
