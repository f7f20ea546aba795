// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! Environment-based configuration management for production deployment

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

/// Default HTTP port when `HTTP_PORT` is not set
const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default database URL when `DATABASE_URL` is not set
const DEFAULT_DATABASE_URL: &str = "sqlite:./data/nutriplan.db";

/// Server configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind the HTTP listener to
    pub http_host: String,
    /// HTTP port for the REST API
    pub http_port: u16,
    /// Database connection URL (`sqlite:` path or `sqlite::memory:`)
    pub database_url: String,
    /// Allowed CORS origin (`*` for permissive)
    pub cors_origin: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse (e.g. a
    /// non-numeric `HTTP_PORT`).
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let http_port = env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
            .parse()
            .context("Invalid HTTP_PORT value")?;

        Ok(Self {
            http_host: env_var_or("HTTP_HOST", "0.0.0.0"),
            http_port,
            database_url: env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            cors_origin: env_var_or("CORS_ORIGIN", "*"),
        })
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "NutriPlan Server Configuration:\n\
             - HTTP Host: {}\n\
             - HTTP Port: {}\n\
             - Database: {}\n\
             - CORS Origin: {}",
            self.http_host,
            self.http_port,
            if self.database_url.starts_with("sqlite:") {
                "SQLite"
            } else {
                "Other"
            },
            self.cors_origin,
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".into(),
            http_port: DEFAULT_HTTP_PORT,
            database_url: DEFAULT_DATABASE_URL.into(),
            cors_origin: "*".into(),
        }
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        env::remove_var("HTTP_HOST");
        env::remove_var("HTTP_PORT");
        env::remove_var("DATABASE_URL");
        env::remove_var("CORS_ORIGIN");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.cors_origin, "*");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        env::set_var("HTTP_PORT", "9090");
        env::set_var("DATABASE_URL", "sqlite::memory:");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.http_port, 9090);
        assert_eq!(config.database_url, "sqlite::memory:");

        env::remove_var("HTTP_PORT");
        env::remove_var("DATABASE_URL");
    }

    #[test]
    #[serial]
    fn test_invalid_port_rejected() {
        env::set_var("HTTP_PORT", "not-a-port");
        assert!(ServerConfig::from_env().is_err());
        env::remove_var("HTTP_PORT");
    }
}
