// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Parses listen address, CORS, buffer capacity, and role verification secret from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management for production deployment

use crate::constants::{env_vars, ports, relay};
use crate::relay::BufferPolicy;
use anyhow::{Context, Result};
use serde::{Serialize, Serializer};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use tracing::{info, warn};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and above
    Warn,
    /// Informational and above
    #[default]
    Info,
    /// Debug and above
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        f.write_str(name)
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Testing => "testing",
        };
        f.write_str(name)
    }
}

/// Cross-origin settings for browser clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; a single `*` allows any origin
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Whether every origin is allowed
    #[must_use]
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|origin| origin == "*")
    }

    /// Whether a request from `origin` may reach the relay
    #[must_use]
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allows_any_origin() || self.allowed_origins.iter().any(|allowed| allowed == origin)
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_owned()],
        }
    }
}

/// Notification buffer settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelayConfig {
    /// Maximum buffered notifications, `0` for unbounded
    pub buffer_capacity: usize,
}

impl RelayConfig {
    /// Retention rule derived from the configured capacity
    #[must_use]
    pub fn buffer_policy(&self) -> BufferPolicy {
        BufferPolicy::from_capacity(self.buffer_capacity)
    }
}

/// Role verification settings
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthConfig {
    /// HS256 secret; when set, streaming connections must present a token
    #[serde(serialize_with = "redact_secret")]
    pub jwt_secret: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[allow(clippy::ref_option)]
fn redact_secret<S: Serializer>(secret: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_bool(secret.is_some())
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerConfig {
    /// HTTP and WebSocket listen port
    pub http_port: u16,
    /// Listen address
    pub host: IpAddr,
    /// Configured log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Cross-origin settings
    pub cors: CorsConfig,
    /// Buffer settings
    pub relay: RelayConfig,
    /// Role verification settings
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: ports::DEFAULT_HTTP_PORT,
            host: IpAddr::from([0, 0, 0, 0]),
            log_level: LogLevel::default(),
            environment: Environment::default(),
            cors: CorsConfig::default(),
            relay: RelayConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or address variable cannot be parsed.
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let http_port = env_var_or(env_vars::HTTP_PORT, &ports::DEFAULT_HTTP_PORT.to_string())
            .parse::<u16>()
            .with_context(|| format!("Invalid {}", env_vars::HTTP_PORT))?;

        let host = env_var_or(env_vars::HOST, ports::DEFAULT_HOST)
            .parse::<IpAddr>()
            .with_context(|| format!("Invalid {}", env_vars::HOST))?;

        let buffer_capacity = env_var_or(
            env_vars::RELAY_BUFFER_CAPACITY,
            &relay::UNBOUNDED_BUFFER.to_string(),
        )
        .parse::<usize>()
        .with_context(|| format!("Invalid {}", env_vars::RELAY_BUFFER_CAPACITY))?;

        let jwt_secret = env::var(env_vars::RELAY_JWT_SECRET)
            .ok()
            .filter(|secret| !secret.is_empty());

        let config = Self {
            http_port,
            host,
            log_level: LogLevel::from_str_or_default(&env_var_or(env_vars::RUST_LOG, "info")),
            environment: Environment::from_str_or_default(&env_var_or(
                env_vars::ENVIRONMENT,
                "development",
            )),
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or(env_vars::CORS_ALLOWED_ORIGINS, "*")),
            },
            relay: RelayConfig { buffer_capacity },
            auth: AuthConfig { jwt_secret },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no CORS origin is configured or an origin cannot be
    /// used as a header value.
    pub fn validate(&self) -> Result<()> {
        if self.cors.allowed_origins.is_empty() {
            return Err(anyhow::anyhow!(
                "{} must be '*' or a non-empty list of origins",
                env_vars::CORS_ALLOWED_ORIGINS
            ));
        }

        if let Some(bad) = self
            .cors
            .allowed_origins
            .iter()
            .find(|origin| http::HeaderValue::from_str(origin).is_err())
        {
            return Err(anyhow::anyhow!(
                "{} contains an origin that is not a valid header value: {bad:?}",
                env_vars::CORS_ALLOWED_ORIGINS
            ));
        }

        if self.environment.is_production() && self.cors.allows_any_origin() {
            warn!("Production deployment allows cross-origin requests from any origin");
        }

        if self.auth.jwt_secret.is_none() {
            info!("Role verification disabled; connection role hints are trusted");
        }

        Ok(())
    }

    /// Socket address to bind
    #[must_use]
    pub const fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.http_port)
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Notification Relay Configuration:\n\
             - Listen: {}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - CORS Origins: {}\n\
             - Buffer: {}\n\
             - Role Verification: {}",
            self.bind_address(),
            self.environment,
            self.log_level,
            self.cors.allowed_origins.join(", "),
            match self.relay.buffer_policy() {
                BufferPolicy::Unbounded => "unbounded".to_owned(),
                BufferPolicy::Bounded(capacity) => format!("last {capacity}"),
            },
            if self.auth.jwt_secret.is_some() {
                "Enabled"
            } else {
                "Disabled"
            },
        )
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse comma-separated CORS origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    if origins_str.trim() == "*" {
        vec!["*".to_owned()]
    } else {
        origins_str
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins("*"), vec!["*"]);
        assert_eq!(
            parse_origins("http://localhost:5173, https://permits.example.org ,"),
            vec!["http://localhost:5173", "https://permits.example.org"]
        );
        assert!(parse_origins(" , ").is_empty());
    }

    #[test]
    fn test_log_level_fallback() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("verbose"), LogLevel::Info);
        assert_eq!(LogLevel::Warn.to_string(), "warn");
    }

    #[test]
    fn test_environment_aliases() {
        assert_eq!(Environment::from_str_or_default("prod"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("staging"), Environment::Development);
    }

    #[test]
    fn test_secret_is_redacted() {
        let config = ServerConfig {
            auth: AuthConfig {
                jwt_secret: Some("hunter2".to_owned()),
            },
            ..ServerConfig::default()
        };

        assert!(!format!("{config:?}").contains("hunter2"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(config.summary().contains("Role Verification: Enabled"));
    }

    #[test]
    fn test_empty_origin_list_fails_validation() {
        let config = ServerConfig {
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparseable_origin_fails_validation() {
        let config = ServerConfig {
            cors: CorsConfig {
                allowed_origins: vec![
                    "http://localhost:5173".to_owned(),
                    "http://bad\norigin".to_owned(),
                ],
            },
            ..ServerConfig::default()
        };
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("CORS_ALLOWED_ORIGINS"));
    }

    #[test]
    fn test_allows_origin() {
        let any = CorsConfig::default();
        assert!(any.allows_origin("http://anywhere.example"));

        let listed = CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_owned()],
        };
        assert!(listed.allows_origin("http://localhost:5173"));
        assert!(!listed.allows_origin("http://evil.example"));
    }

    #[test]
    fn test_default_bind_address() {
        assert_eq!(
            ServerConfig::default().bind_address().to_string(),
            "0.0.0.0:4000"
        );
    }
}
