// ABOUTME: Error types re-exported from relay-core for use throughout the server crate
// ABOUTME: AppError doubles as the axum error response via the http-response feature
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use relay_core::errors::{
    AppError, AppResult, ErrorCode, ErrorResponse, ErrorResponseDetails,
};
