// ABOUTME: Closed set of user roles used to scope notification delivery
// ABOUTME: Provides parsing and display implementations for wire role names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::roles;
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User category a notification is addressed to
///
/// Matching is exact: a connection joined to `Inspector` never sees `Admin`
/// traffic and there is no wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrator
    Admin,
    /// Fire-safety inspector
    Inspector,
    /// Establishment owner
    Owner,
}

impl Role {
    /// Every role, in stable order
    pub const ALL: [Self; 3] = [Self::Admin, Self::Inspector, Self::Owner];

    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => roles::ADMIN,
            Self::Inspector => roles::INSPECTOR,
            Self::Owner => roles::OWNER,
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            roles::ADMIN => Ok(Self::Admin),
            roles::INSPECTOR => Ok(Self::Inspector),
            roles::OWNER => Ok(Self::Owner),
            _ => Err(AppError::invalid_input(format!("Unknown role: {s}"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_is_exact() {
        assert_eq!("inspector".parse::<Role>().unwrap(), Role::Inspector);
        assert!("Inspector".parse::<Role>().is_err());
        assert!(" owner".parse::<Role>().is_err());
        assert!("*".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_matches_display() {
        for role in Role::ALL {
            let json = serde_json::to_value(role).unwrap();
            assert_eq!(json, role.to_string());
        }
    }
}
