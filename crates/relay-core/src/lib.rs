// ABOUTME: Core types and constants for the role-scoped notification relay
// ABOUTME: Foundation crate with error handling, notification models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Relay Core
//!
//! Foundation crate providing shared types and constants for the notification
//! relay. It changes rarely, which keeps incremental builds of the server
//! crate cheap.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Application-wide constants organized by domain
//! - **models**: `Role`, `Notification`, and publisher payload types

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models
pub mod models;
