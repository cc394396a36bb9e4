// ABOUTME: Core data models for the notification relay
// ABOUTME: Re-exports Role, Notification, and the publisher request/draft types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - `Role`: closed set of user categories that scope delivery
//! - `Notification`: the stored and delivered entity
//! - `NotificationRequest`: raw publisher payload, validated into a
//!   `NotificationDraft` before the relay assigns `id` and `time`

mod notification;
mod role;

pub use notification::{Notification, NotificationDraft, NotificationRequest};
pub use role::Role;
