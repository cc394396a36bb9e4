// ABOUTME: Messages exchanged between the relay and its streaming clients
// ABOUTME: Internally tagged JSON frames for snapshots, live notifications, acks, and errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::{Notification, NotificationRequest, Role};
use serde::{Deserialize, Serialize};

/// Relay → client frames
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RelayEvent {
    /// Buffered notifications for the connect-time role, sent once
    InitialNotifications {
        /// Notifications in publish order
        notifications: Vec<Notification>,
    },
    /// A live notification for a joined role
    Notification {
        /// The completed notification
        notification: Notification,
    },
    /// Acknowledges a `joinRole` request
    Joined {
        /// Role now joined
        role: Role,
    },
    /// Something the client sent could not be honored
    Error {
        /// Error description
        message: String,
    },
}

impl RelayEvent {
    /// Build an error frame
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Client → relay frames
#[non_exhaustive]
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Subscribe this connection to future broadcasts for a role
    JoinRole {
        /// Role name as sent by the client
        role: String,
    },
    /// Publish a notification over the streaming channel
    NewNotification {
        /// Publish payload without `id`/`time`
        notification: NotificationRequest,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_messages_parse() {
        let join: ClientMessage =
            serde_json::from_value(json!({"type": "joinRole", "role": "inspector"})).unwrap();
        assert!(matches!(join, ClientMessage::JoinRole { role } if role == "inspector"));

        let publish: ClientMessage = serde_json::from_value(json!({
            "type": "newNotification",
            "notification": {"userRole": "owner", "title": "Permit approved", "type": "success"}
        }))
        .unwrap();
        let ClientMessage::NewNotification { notification } = publish else {
            panic!("expected newNotification");
        };
        assert_eq!(notification.user_role.as_deref(), Some("owner"));
        assert_eq!(notification.extra["type"], "success");
    }

    #[test]
    fn test_relay_event_tags() {
        let frame = serde_json::to_value(RelayEvent::Joined { role: Role::Admin }).unwrap();
        assert_eq!(frame, json!({"type": "joined", "role": "admin"}));

        let frame = serde_json::to_value(RelayEvent::InitialNotifications {
            notifications: Vec::new(),
        })
        .unwrap();
        assert_eq!(frame["type"], "initialNotifications");
    }
}
