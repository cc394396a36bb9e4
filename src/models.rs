// ABOUTME: Notification relay data models re-exported from relay-core
// ABOUTME: Role, Notification, and the publisher request/draft types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Data models shared by the relay, its routes, and its tests.

pub use relay_core::models::{Notification, NotificationDraft, NotificationRequest, Role};
