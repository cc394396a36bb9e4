// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Spawns the full relay app on an ephemeral port and drives WebSocket clients against it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic
)]
//! Shared test utilities for `notification_relay`

use futures_util::{SinkExt, StreamExt};
use notification_relay::{
    config::{AuthConfig, ServerConfig},
    relay::{BufferPolicy, RelayHandle, RelayHub},
    server::build_app,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Once;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

/// Client side of a streaming connection
pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a client waits for an expected frame
pub const FRAME_TIMEOUT: Duration = Duration::from_secs(2);

/// How long a client listens to confirm nothing arrives
pub const SILENCE_WINDOW: Duration = Duration::from_millis(300);

/// Shared secret used by verified-mode tests
pub const TEST_JWT_SECRET: &str = "relay-integration-secret";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Configuration with role verification disabled
pub fn trusted_config() -> ServerConfig {
    ServerConfig::default()
}

/// Configuration with role verification enabled
pub fn verified_config() -> ServerConfig {
    ServerConfig {
        auth: AuthConfig {
            jwt_secret: Some(TEST_JWT_SECRET.to_owned()),
        },
        ..ServerConfig::default()
    }
}

/// A relay app served on `127.0.0.1` with an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub relay: RelayHandle,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start the full app with an unbounded buffer
    pub async fn start(config: ServerConfig) -> Self {
        Self::start_with_policy(config, BufferPolicy::Unbounded).await
    }

    /// Start the full app with a specific buffer policy
    pub async fn start_with_policy(config: ServerConfig, policy: BufferPolicy) -> Self {
        init_test_logging();
        let (relay, _relay_task) = RelayHub::spawn(policy);
        let app = build_app(config, relay.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            relay,
            handle,
        }
    }

    /// `http://` URL for a path
    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// `ws://` URL of the streaming endpoint with a raw query string
    pub fn ws_url(&self, query: &str) -> String {
        format!("ws://{}/ws?{query}", self.addr)
    }

    /// Connect a streaming client with a role hint and return it with its snapshot
    pub async fn connect(&self, role_hint: &str) -> (WsClient, Vec<Value>) {
        self.connect_with_query(&format!("role={role_hint}")).await
    }

    /// Connect with an arbitrary query string and return the client with its snapshot
    pub async fn connect_with_query(&self, query: &str) -> (WsClient, Vec<Value>) {
        let (mut ws, _) = connect_async(self.ws_url(query)).await.unwrap();
        let frame = next_frame(&mut ws).await;
        assert_eq!(frame["type"], "initialNotifications", "got {frame}");
        let snapshot = frame["notifications"].as_array().unwrap().clone();
        (ws, snapshot)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Send a JSON value as a text frame
pub async fn send_json(ws: &mut WsClient, value: &Value) {
    ws.send(Message::Text(value.to_string())).await.unwrap();
}

/// Next JSON text frame, failing the test if none arrives in time
pub async fn next_frame(ws: &mut WsClient) -> Value {
    loop {
        let message = timeout(FRAME_TIMEOUT, ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("connection closed")
            .expect("transport error");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// Assert no text frame arrives within the silence window
pub async fn assert_silent(ws: &mut WsClient) {
    if let Ok(Some(Ok(Message::Text(text)))) = timeout(SILENCE_WINDOW, ws.next()).await {
        panic!("expected no frame, got {text}");
    }
}

/// Join a role and wait for the acknowledgment
pub async fn join(ws: &mut WsClient, role: &str) {
    send_json(ws, &serde_json::json!({"type": "joinRole", "role": role})).await;
    let ack = next_frame(ws).await;
    assert_eq!(ack["type"], "joined", "got {ack}");
    assert_eq!(ack["role"], role);
}
