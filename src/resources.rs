// ABOUTME: Shared server resources handed to every route group
// ABOUTME: Bundles configuration, the relay handle, role verification, and the session manager
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::auth::RoleVerifier;
use crate::config::ServerConfig;
use crate::relay::RelayHandle;
use crate::websocket::WebSocketManager;
use std::sync::Arc;

/// Everything a request handler may need, created once at startup
#[derive(Debug, Clone)]
pub struct RelayResources {
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Handle to the relay event loop
    pub relay: RelayHandle,
    /// Connection role verification
    pub verifier: Arc<RoleVerifier>,
    /// Streaming session runner
    pub websocket: Arc<WebSocketManager>,
}

impl RelayResources {
    /// Wire resources around a running relay
    #[must_use]
    pub fn new(config: ServerConfig, relay: RelayHandle) -> Self {
        let verifier = RoleVerifier::from_secret(config.auth.jwt_secret.as_deref());
        let websocket = WebSocketManager::new(relay.clone());
        Self {
            config: Arc::new(config),
            relay,
            verifier: Arc::new(verifier),
            websocket: Arc::new(websocket),
        }
    }
}
