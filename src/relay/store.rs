// ABOUTME: Single-writer store holding the notification buffer and role broadcast groups
// ABOUTME: All relay bookkeeping (snapshot, join, publish fan-out, disconnect) happens here synchronously
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! In-memory relay state.
//!
//! The store is owned by exactly one task (see [`super::hub::RelayHub`]) and
//! every method runs to completion before the next command is processed, so
//! a broadcast can never interleave with a join, a snapshot, or another
//! broadcast.

use super::events::RelayEvent;
use crate::errors::{AppError, AppResult};
use crate::models::{Notification, NotificationDraft, Role};
use chrono::Utc;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::num::NonZeroUsize;
use tokio::sync::mpsc;
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Identifier of one streaming connection, unique for the process lifetime
pub type ConnectionId = u64;

/// Outbound queue of a single connection
pub type Outbox = mpsc::UnboundedSender<RelayEvent>;

/// Retention rule for the notification buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BufferPolicy {
    /// Keep every notification for the lifetime of the process
    #[default]
    Unbounded,
    /// Keep at most this many notifications, evicting the oldest first
    Bounded(NonZeroUsize),
}

impl BufferPolicy {
    /// Build a policy from a configured capacity where `0` means unbounded
    #[must_use]
    pub fn from_capacity(capacity: usize) -> Self {
        NonZeroUsize::new(capacity).map_or(Self::Unbounded, Self::Bounded)
    }
}

/// Result of a single publish
#[derive(Debug, Clone)]
pub struct PublishOutcome {
    /// The stored notification with its assigned `id` and `time`
    pub notification: Notification,
    /// Number of connections the notification was queued to
    pub delivered: usize,
}

/// Point-in-time relay counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayStats {
    /// Notifications currently buffered
    pub buffered_notifications: usize,
    /// Streaming connections currently open
    pub active_connections: usize,
    /// Joined connections per role
    pub joined_connections: BTreeMap<Role, usize>,
    /// Notifications dropped by the bounded buffer since start
    pub evicted_notifications: u64,
}

#[derive(Debug)]
struct Subscriber {
    outbox: Outbox,
    roles: Vec<Role>,
}

/// Notification buffer plus role-indexed broadcast groups
#[derive(Debug, Default)]
pub struct RelayStore {
    policy: BufferPolicy,
    notifications: VecDeque<Notification>,
    connections: HashMap<ConnectionId, Subscriber>,
    groups: HashMap<Role, Vec<ConnectionId>>,
    next_connection_id: ConnectionId,
    evicted: u64,
}

impl RelayStore {
    /// Create an empty store
    #[must_use]
    pub fn new(policy: BufferPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Register a connection and queue its snapshot
    ///
    /// `role_hint` is matched exactly against role names. A hint that names
    /// no role yields an empty snapshot rather than an error.
    pub fn connect(&mut self, role_hint: &str, outbox: Outbox) -> ConnectionId {
        self.next_connection_id += 1;
        let connection_id = self.next_connection_id;

        let notifications = role_hint
            .parse::<Role>()
            .map(|role| self.snapshot(role))
            .unwrap_or_default();
        let snapshot_len = notifications.len();

        if outbox
            .send(RelayEvent::InitialNotifications { notifications })
            .is_err()
        {
            trace!(connection_id, "Connection closed before snapshot was queued");
        }

        self.connections.insert(
            connection_id,
            Subscriber {
                outbox,
                roles: Vec::new(),
            },
        );

        info!(
            connection_id,
            role_hint = %role_hint,
            snapshot_len,
            "Relay connection registered"
        );
        connection_id
    }

    /// Buffered notifications for `role`, in publish order
    #[must_use]
    pub fn snapshot(&self, role: Role) -> Vec<Notification> {
        self.notifications
            .iter()
            .filter(|notification| notification.user_role == role)
            .cloned()
            .collect()
    }

    /// Add a connection to a role group
    ///
    /// Returns `true` if the connection was not already a member. Repeated
    /// joins are acknowledged again but never create a second membership.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is unknown (already disconnected).
    pub fn join(&mut self, connection_id: ConnectionId, role: Role) -> AppResult<bool> {
        let subscriber = self
            .connections
            .get_mut(&connection_id)
            .ok_or_else(|| AppError::not_found(format!("Connection {connection_id}")))?;

        let newly_joined = !subscriber.roles.contains(&role);
        if newly_joined {
            subscriber.roles.push(role);
            self.groups.entry(role).or_default().push(connection_id);
        }

        if subscriber.outbox.send(RelayEvent::Joined { role }).is_err() {
            trace!(connection_id, "Connection closed before join ack was queued");
        }

        debug!(connection_id, role = %role, newly_joined, "Role joined");
        Ok(newly_joined)
    }

    /// Assign identity, buffer, and fan out a notification to its role group
    pub fn publish(&mut self, draft: NotificationDraft) -> PublishOutcome {
        let notification = draft.into_notification(Uuid::new_v4().to_string(), Utc::now());

        self.notifications.push_back(notification.clone());
        self.enforce_capacity();

        let delivered = self.broadcast(&notification);

        info!(
            notification_id = %notification.id,
            role = %notification.user_role,
            delivered,
            "Notification published"
        );

        PublishOutcome {
            notification,
            delivered,
        }
    }

    /// Remove a connection from every group it joined
    ///
    /// Returns `false` if the connection was already gone.
    pub fn disconnect(&mut self, connection_id: ConnectionId) -> bool {
        let Some(subscriber) = self.connections.remove(&connection_id) else {
            return false;
        };

        for role in &subscriber.roles {
            if let Some(members) = self.groups.get_mut(role) {
                members.retain(|member| *member != connection_id);
                if members.is_empty() {
                    self.groups.remove(role);
                }
            }
        }

        info!(
            connection_id,
            joined_roles = subscriber.roles.len(),
            "Relay connection removed"
        );
        true
    }

    /// Current counters
    #[must_use]
    pub fn stats(&self) -> RelayStats {
        RelayStats {
            buffered_notifications: self.notifications.len(),
            active_connections: self.connections.len(),
            joined_connections: self
                .groups
                .iter()
                .map(|(role, members)| (*role, members.len()))
                .collect(),
            evicted_notifications: self.evicted,
        }
    }

    fn broadcast(&self, notification: &Notification) -> usize {
        let Some(members) = self.groups.get(&notification.user_role) else {
            return 0;
        };

        let mut delivered = 0;
        for connection_id in members {
            let Some(subscriber) = self.connections.get(connection_id) else {
                continue;
            };
            let event = RelayEvent::Notification {
                notification: notification.clone(),
            };
            if subscriber.outbox.send(event).is_ok() {
                delivered += 1;
            } else {
                // Transport already gone; its session will disconnect shortly
                trace!(connection_id, "Skipping closed connection during broadcast");
            }
        }
        delivered
    }

    fn enforce_capacity(&mut self) {
        let BufferPolicy::Bounded(capacity) = self.policy else {
            return;
        };
        while self.notifications.len() > capacity.get() {
            if let Some(evicted) = self.notifications.pop_front() {
                self.evicted += 1;
                debug!(notification_id = %evicted.id, "Evicted oldest notification");
            }
        }
    }
}
