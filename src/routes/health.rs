// ABOUTME: Health check route handlers for service monitoring and status endpoints
// ABOUTME: Liveness always answers; readiness reports whether the relay event loop is running
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use crate::constants::{endpoints, service_names};
use crate::resources::RelayResources;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: RelayResources) -> Router {
        Router::new()
            .route(endpoints::HEALTH, get(Self::health_handler))
            .route(endpoints::READY, get(Self::ready_handler))
            .with_state(resources)
    }

    async fn health_handler() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "service": service_names::NOTIFICATION_RELAY,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn ready_handler(State(resources): State<RelayResources>) -> (StatusCode, Json<Value>) {
        let (status, label) = if resources.relay.is_running() {
            (StatusCode::OK, "ready")
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        };
        (
            status,
            Json(json!({
                "status": label,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
        )
    }
}
