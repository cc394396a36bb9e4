// ABOUTME: Connection role verification for the streaming endpoint
// ABOUTME: Trusted mode accepts client role hints; verified mode requires an HS256 session token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Role Verification
//!
//! By default the relay trusts the role a client names when it connects and
//! joins. When a shared secret is configured, each streaming connection must
//! present a session token whose `role` claim decides which role the
//! connection may snapshot and join.

use crate::errors::{AppError, AppResult};
use crate::models::Role;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Claims carried by a relay session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user identifier in the host application)
    pub sub: String,
    /// Role the bearer is entitled to
    pub role: Role,
    /// Expiry as seconds since the Unix epoch
    pub exp: i64,
}

/// Who a streaming connection is allowed to act as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionIdentity {
    /// Connect-time role hint used for the snapshot
    pub role_hint: String,
    /// Role proven by a session token, if verification is enabled
    pub verified_role: Option<Role>,
    /// Token subject, if verification is enabled
    pub subject: Option<String>,
}

impl ConnectionIdentity {
    /// Identity for a connection whose hint is taken at face value
    pub fn trusted(role_hint: impl Into<String>) -> Self {
        Self {
            role_hint: role_hint.into(),
            verified_role: None,
            subject: None,
        }
    }

    /// Whether this connection may join `role`
    #[must_use]
    pub fn permits(&self, role: Role) -> bool {
        self.verified_role.is_none_or(|verified| verified == role)
    }
}

/// Decides the identity of each streaming connection
#[derive(Clone)]
pub enum RoleVerifier {
    /// Role hints and joins are accepted as sent
    Trusted,
    /// Role comes from a signed session token
    Verified {
        /// HS256 verification key
        key: DecodingKey,
        /// Token validation rules
        validation: Validation,
    },
}

impl std::fmt::Debug for RoleVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trusted => f.write_str("Trusted"),
            Self::Verified { .. } => f.write_str("Verified"),
        }
    }
}

impl RoleVerifier {
    /// Build a verifier from an optional shared secret
    #[must_use]
    pub fn from_secret(secret: Option<&str>) -> Self {
        secret.map_or(Self::Trusted, |secret| Self::Verified {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        })
    }

    /// Resolve the identity of a connecting client
    ///
    /// # Errors
    ///
    /// In verified mode, returns an error if the token is missing, invalid,
    /// or expired, or if `role_hint` names a different role than the token.
    pub fn resolve(&self, role_hint: &str, token: Option<&str>) -> AppResult<ConnectionIdentity> {
        let Self::Verified { key, validation } = self else {
            return Ok(ConnectionIdentity::trusted(role_hint));
        };

        let token = token
            .filter(|token| !token.is_empty())
            .ok_or_else(AppError::auth_required)?;
        let claims = decode::<SessionClaims>(token, key, validation)
            .map_err(|e| convert_jwt_error(&e))?
            .claims;

        if !role_hint.is_empty() && role_hint != claims.role.as_str() {
            return Err(AppError::permission_denied(format!(
                "Token grants role {} but connection requested {role_hint}",
                claims.role
            )));
        }

        Ok(ConnectionIdentity {
            role_hint: claims.role.as_str().to_owned(),
            verified_role: Some(claims.role),
            subject: Some(claims.sub),
        })
    }
}

fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> AppError {
    match e.kind() {
        ErrorKind::ExpiredSignature => AppError::auth_expired(),
        ErrorKind::InvalidSignature => {
            warn!("Session token signature verification failed");
            AppError::auth_invalid("Token signature verification failed")
        }
        _ => {
            warn!(error = %e, "Session token rejected");
            AppError::auth_invalid(format!("Token validation failed: {e}"))
        }
    }
}

/// Sign a session token granting `role` to `subject` for `ttl`
///
/// # Errors
///
/// Returns an error if the token cannot be encoded.
pub fn issue_token(secret: &str, subject: &str, role: Role, ttl: Duration) -> AppResult<String> {
    let claims = SessionClaims {
        sub: subject.to_owned(),
        role,
        exp: (Utc::now() + ttl).timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Failed to sign session token: {e}")).with_source(e))
}
