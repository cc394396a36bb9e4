// ABOUTME: Role-scoped notification relay: buffer, broadcast groups, and event loop
// ABOUTME: Re-exports the handle, store, and wire event types used by routes and sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Notification relay core.
//!
//! - [`store`] holds the buffer and role groups
//! - [`hub`] runs the store behind a command queue
//! - [`events`] defines the streaming frames

pub mod events;
pub mod hub;
pub mod store;

pub use events::{ClientMessage, RelayEvent};
pub use hub::{Command, RelayHandle, RelayHub};
pub use store::{BufferPolicy, ConnectionId, Outbox, PublishOutcome, RelayStats, RelayStore};
