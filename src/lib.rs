// ABOUTME: Main library entry point for the role-scoped notification relay
// ABOUTME: Buffers notifications in memory and fans them out to role-joined WebSocket clients
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Notification Relay
//!
//! A real-time notification relay for the fire-safety permit application.
//! Producers publish notifications addressed to a role (`admin`,
//! `inspector`, `owner`); the relay keeps them in an in-memory buffer and
//! pushes each one to every streaming client that joined that role.
//!
//! ## Architecture
//!
//! - **Relay**: single-owner store driven through a command queue
//! - **WebSocket**: per-connection session bridging frames to the relay
//! - **Routes**: health, one-shot publish/snapshot, and the streaming endpoint
//! - **Auth**: optional token-based role verification for streaming clients
//! - **Config**: environment-driven server configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use notification_relay::config::ServerConfig;
//! use notification_relay::server::RelayServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     RelayServer::new(config).run().await
//! }
//! ```

/// Connection role verification
pub mod auth;

/// Configuration management
pub mod config;

/// Application constants
pub mod constants;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Data models
pub mod models;

/// Notification buffer, role groups, and event loop
pub mod relay;

/// Shared resources handed to route groups
pub mod resources;

/// HTTP route groups
pub mod routes;

/// Server assembly and lifecycle
pub mod server;

/// WebSocket session handling
pub mod websocket;
