// ABOUTME: One-shot notification publishing and snapshot route handlers
// ABOUTME: Lets backend producers publish over HTTP and clients read the buffer without a socket
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::endpoints;
use crate::errors::{AppError, AppResult};
use crate::models::{Notification, NotificationRequest, Role};
use crate::relay::RelayStats;
use crate::resources::RelayResources;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Response to a successful publish
#[derive(Debug, Serialize, Deserialize)]
pub struct PublishResponse {
    /// Always `true`
    pub success: bool,
    /// Stored notification with assigned `id` and `time`
    pub notification: Notification,
    /// Connections the notification was queued to
    pub delivered: usize,
}

/// Query for `GET /api/notifications`
#[derive(Debug, Deserialize)]
pub struct SnapshotQuery {
    /// Role whose buffered notifications are returned
    pub role: Option<String>,
}

/// Response to a snapshot read
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotResponse {
    /// Role the snapshot was filtered by
    pub role: Role,
    /// Buffered notifications in publish order
    pub notifications: Vec<Notification>,
}

/// Notification routes implementation
pub struct NotificationRoutes;

impl NotificationRoutes {
    /// Create publish, snapshot, and stats routes
    pub fn routes(resources: RelayResources) -> Router {
        Router::new()
            .route(
                endpoints::NOTIFICATIONS,
                get(Self::handle_snapshot).post(Self::handle_publish),
            )
            .route(endpoints::NOTIFICATION_STATS, get(Self::handle_stats))
            .with_state(resources)
    }

    async fn handle_publish(
        State(resources): State<RelayResources>,
        body: Result<Json<NotificationRequest>, JsonRejection>,
    ) -> AppResult<(StatusCode, Json<PublishResponse>)> {
        let Json(request) = body.map_err(|rejection| {
            AppError::invalid_format(format!("Invalid notification body: {}", rejection.body_text()))
        })?;
        let draft = request.validate()?;
        let outcome = resources.relay.publish(draft).await?;

        info!(
            notification_id = %outcome.notification.id,
            delivered = outcome.delivered,
            "Notification published over HTTP"
        );

        Ok((
            StatusCode::CREATED,
            Json(PublishResponse {
                success: true,
                notification: outcome.notification,
                delivered: outcome.delivered,
            }),
        ))
    }

    async fn handle_snapshot(
        State(resources): State<RelayResources>,
        Query(query): Query<SnapshotQuery>,
    ) -> AppResult<Json<SnapshotResponse>> {
        let role = query
            .role
            .ok_or_else(|| AppError::missing_field("role"))?
            .parse::<Role>()?;
        let notifications = resources.relay.snapshot(role).await?;
        Ok(Json(SnapshotResponse {
            role,
            notifications,
        }))
    }

    async fn handle_stats(State(resources): State<RelayResources>) -> AppResult<Json<RelayStats>> {
        Ok(Json(resources.relay.stats().await?))
    }
}
