// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for ports, roles, wire message names, and relay limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! flat namespace.

/// Service identity
pub mod service_names {
    /// Service name used in logs and health responses
    pub const NOTIFICATION_RELAY: &str = "notification-relay";
}

/// Role names as they appear on the wire
pub mod roles {
    /// Administrator role
    pub const ADMIN: &str = "admin";
    /// Fire-safety inspector role
    pub const INSPECTOR: &str = "inspector";
    /// Establishment owner role
    pub const OWNER: &str = "owner";
}

/// API endpoints
pub mod endpoints {
    /// Health check endpoint
    pub const HEALTH: &str = "/health";
    /// Readiness endpoint
    pub const READY: &str = "/ready";
    /// Streaming channel endpoint
    pub const WEBSOCKET: &str = "/ws";
    /// One-shot publish and snapshot endpoint
    pub const NOTIFICATIONS: &str = "/api/notifications";
    /// Relay statistics endpoint
    pub const NOTIFICATION_STATS: &str = "/api/notifications/stats";
}

/// Network ports and addresses
pub mod ports {
    /// Default HTTP port
    pub const DEFAULT_HTTP_PORT: u16 = 4000;
    /// Default bind address
    pub const DEFAULT_HOST: &str = "0.0.0.0";
}

/// Relay event loop sizing
pub mod relay {
    /// Capacity of the command queue feeding the relay event loop
    pub const COMMAND_CHANNEL_CAPACITY: usize = 1024;
    /// Buffer capacity meaning "keep everything"
    pub const UNBOUNDED_BUFFER: usize = 0;
}

/// HTTP headers used by the relay
pub mod headers {
    /// Request correlation header
    pub const REQUEST_ID: &str = "x-request-id";
}

/// Environment variable names
pub mod env_vars {
    /// Listen port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Listen address
    pub const HOST: &str = "HOST";
    /// Allowed cross-origin origins (`*` or comma-separated list)
    pub const CORS_ALLOWED_ORIGINS: &str = "CORS_ALLOWED_ORIGINS";
    /// Maximum buffered notifications (0 = unbounded)
    pub const RELAY_BUFFER_CAPACITY: &str = "RELAY_BUFFER_CAPACITY";
    /// HS256 secret enabling verified roles
    pub const RELAY_JWT_SECRET: &str = "RELAY_JWT_SECRET";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Log output format
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Log filter directive
    pub const RUST_LOG: &str = "RUST_LOG";
}
