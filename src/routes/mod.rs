// ABOUTME: Route module organization for the notification relay HTTP endpoints
// ABOUTME: Groups health, one-shot notification, and WebSocket routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the notification relay
//!
//! Each route group owns its handlers and receives the shared
//! [`crate::resources::RelayResources`] as router state.

/// Health check and readiness routes
pub mod health;
/// One-shot publish, snapshot, and stats routes
pub mod notifications;
/// WebSocket routes for the streaming channel
pub mod websocket;

pub use health::HealthRoutes;
pub use notifications::{NotificationRoutes, PublishResponse, SnapshotResponse};
pub use websocket::{ConnectParams, WebSocketRoutes};
