// ABOUTME: Constants re-exported from relay-core
// ABOUTME: Roles, endpoints, ports, headers, and environment variable names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use relay_core::constants::*;
