// ABOUTME: WebSocket session handling for relay clients
// ABOUTME: Bridges one socket to the relay: snapshot on connect, role joins, publishes, live delivery
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! `WebSocket` support for the notification relay
//!
//! Each connection gets an outbound queue drained by a forwarding task, so
//! the relay never blocks on a slow socket. Inbound frames are handled in
//! order on the connection's own task.

use crate::auth::ConnectionIdentity;
use crate::errors::AppError;
use crate::models::Role;
use crate::relay::{ClientMessage, ConnectionId, RelayEvent, RelayHandle};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Runs streaming sessions against the relay
#[derive(Debug, Clone)]
pub struct WebSocketManager {
    relay: RelayHandle,
}

impl WebSocketManager {
    /// Creates a new WebSocket manager instance
    #[must_use]
    pub const fn new(relay: RelayHandle) -> Self {
        Self { relay }
    }

    /// Handle an upgraded connection until the client goes away
    pub async fn handle_connection(&self, ws: WebSocket, identity: ConnectionIdentity) {
        let (mut ws_tx, mut ws_rx) = ws.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<RelayEvent>();

        // Spawn task to forward relay events to the socket
        let ws_send_task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let json = match serde_json::to_string(&event) {
                    Ok(json) => json,
                    Err(e) => {
                        warn!(error = %e, "Failed to serialize relay event");
                        continue;
                    }
                };
                if ws_tx.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }
        });

        let connection_id = match self.relay.connect(&identity.role_hint, tx.clone()).await {
            Ok(connection_id) => connection_id,
            Err(e) => {
                warn!(error = %e, "Rejecting connection, relay unavailable");
                Self::send_error(&tx, &e);
                drop(tx);
                if let Err(join_error) = ws_send_task.await {
                    warn!(error = %join_error, "WebSocket forwarding task failed");
                }
                return;
            }
        };

        info!(
            connection_id,
            role_hint = %identity.role_hint,
            subject = ?identity.subject,
            "Relay client connected"
        );

        while let Some(msg) = ws_rx.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    self.handle_text(connection_id, &identity, &text, &tx).await;
                }
                Ok(Message::Close(_)) | Err(_) => break,
                _ => {}
            }
        }

        // Clean up on disconnect
        self.relay.disconnect(connection_id).await;
        ws_send_task.abort();
        info!(connection_id, "Relay client disconnected");
    }

    async fn handle_text(
        &self,
        connection_id: ConnectionId,
        identity: &ConnectionIdentity,
        text: &str,
        tx: &mpsc::UnboundedSender<RelayEvent>,
    ) {
        let message = match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => message,
            Err(e) => {
                debug!(connection_id, error = %e, "Unparseable client frame");
                Self::send_error(tx, &AppError::invalid_format(format!("Invalid message format: {e}")));
                return;
            }
        };

        match message {
            ClientMessage::JoinRole { role } => {
                self.handle_join(connection_id, identity, &role, tx).await;
            }
            ClientMessage::NewNotification { notification } => {
                let result = match notification.validate() {
                    Ok(draft) => self.relay.publish(draft).await.map(|_| ()),
                    Err(e) => Err(e),
                };
                if let Err(e) = result {
                    debug!(connection_id, error = %e, "Streamed publish rejected");
                    Self::send_error(tx, &e);
                }
            }
        }
    }

    async fn handle_join(
        &self,
        connection_id: ConnectionId,
        identity: &ConnectionIdentity,
        role: &str,
        tx: &mpsc::UnboundedSender<RelayEvent>,
    ) {
        let role = match role.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                Self::send_error(tx, &e);
                return;
            }
        };

        if !identity.permits(role) {
            warn!(connection_id, role = %role, "Join refused for unverified role");
            Self::send_error(
                tx,
                &AppError::permission_denied(format!("Connection may not join role {role}")),
            );
            return;
        }

        if let Err(e) = self.relay.join(connection_id, role).await {
            Self::send_error(tx, &e);
        }
    }

    fn send_error(tx: &mpsc::UnboundedSender<RelayEvent>, error: &AppError) {
        if tx.send(RelayEvent::error(error.message.clone())).is_err() {
            debug!("Connection closed before error frame was queued");
        }
    }
}
