// ABOUTME: Notification entity and the publisher-facing request/draft types
// ABOUTME: Validates incoming payloads and carries opaque pass-through fields untouched
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Role;
use crate::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names the relay assigns itself and never accepts from publishers
const RELAY_ASSIGNED_FIELDS: [&str; 2] = ["id", "time"];

/// A published notification as stored and delivered by the relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Relay-assigned unique identifier
    pub id: String,
    /// Role the notification is routed to
    pub user_role: Role,
    /// Display title
    pub title: String,
    /// Display body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Relay-assigned creation time
    pub time: DateTime<Utc>,
    /// Publisher fields passed through without interpretation
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw publish payload as received from a producer
///
/// Every field is optional here so that a missing field produces a
/// field-specific error from [`NotificationRequest::validate`] instead of a
/// generic parse failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    /// Target role name
    #[serde(default)]
    pub user_role: Option<String>,
    /// Display title
    #[serde(default)]
    pub title: Option<String>,
    /// Display body
    #[serde(default)]
    pub description: Option<String>,
    /// Anything else the publisher sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NotificationRequest {
    /// Check required fields and produce a draft ready for publishing
    ///
    /// # Errors
    ///
    /// Returns an error if `userRole` is missing or not a known role, or if
    /// `title` is missing or blank.
    pub fn validate(self) -> AppResult<NotificationDraft> {
        let user_role = self
            .user_role
            .ok_or_else(|| AppError::missing_field("userRole"))?
            .parse::<Role>()?;

        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("title"))?;

        let mut extra = self.extra;
        for field in RELAY_ASSIGNED_FIELDS {
            extra.remove(field);
        }

        Ok(NotificationDraft {
            user_role,
            title,
            description: self.description,
            extra,
        })
    }
}

/// A validated notification still lacking its relay-assigned `id` and `time`
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationDraft {
    /// Role the notification is routed to
    pub user_role: Role,
    /// Display title
    pub title: String,
    /// Display body
    pub description: Option<String>,
    /// Publisher fields passed through without interpretation
    pub extra: Map<String, Value>,
}

impl NotificationDraft {
    /// Create a draft with only the required fields
    pub fn new(user_role: Role, title: impl Into<String>) -> Self {
        Self {
            user_role,
            title: title.into(),
            description: None,
            extra: Map::new(),
        }
    }

    /// Set the display body
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an opaque pass-through field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !RELAY_ASSIGNED_FIELDS.contains(&key.as_str()) {
            self.extra.insert(key, value);
        }
        self
    }

    /// Complete the draft with relay-assigned identity
    #[must_use]
    pub fn into_notification(self, id: String, time: DateTime<Utc>) -> Notification {
        Notification {
            id,
            user_role: self.user_role,
            title: self.title,
            description: self.description,
            time,
            extra: self.extra,
        }
    }
}
