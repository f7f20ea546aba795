// ABOUTME: HTTP server assembly: shared resources, router construction, listener loop
// ABOUTME: Merges the domain routers and applies tracing and CORS layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! HTTP server for the NutriPlan REST API

use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::routes::{HealthRoutes, MealPlanRoutes, PreferenceRoutes, RecipeRoutes};
use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state handed to every route handler
pub struct ServerResources {
    /// Database pool and managers
    pub database: Database,
    /// Runtime configuration
    pub config: ServerConfig,
}

impl ServerResources {
    /// Create the shared resource bundle
    #[must_use]
    pub const fn new(database: Database, config: ServerConfig) -> Self {
        Self { database, config }
    }
}

/// HTTP server wrapping the assembled router
pub struct HttpServer {
    resources: Arc<ServerResources>,
}

impl HttpServer {
    /// Create a new HTTP server around the shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Assemble the full application router
    ///
    /// # Errors
    ///
    /// Returns an error if the configured CORS origin is not a valid
    /// header value.
    pub fn router(&self) -> Result<Router> {
        let cors = if self.resources.config.cors_origin == "*" {
            CorsLayer::permissive()
        } else {
            let origin = self
                .resources
                .config
                .cors_origin
                .parse::<HeaderValue>()
                .context("Invalid CORS_ORIGIN value")?;
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Ok(Router::new()
            .merge(HealthRoutes::routes())
            .merge(RecipeRoutes::routes(self.resources.clone()))
            .merge(MealPlanRoutes::routes(self.resources.clone()))
            .merge(PreferenceRoutes::routes(self.resources.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(cors))
    }

    /// Bind the listener and serve requests until shutdown
    ///
    /// # Errors
    ///
    /// Returns an error if binding or serving fails
    pub async fn run(&self) -> Result<()> {
        let addr = format!(
            "{}:{}",
            self.resources.config.http_host, self.resources.config.http_port
        );
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        info!("HTTP server listening on {addr}");

        axum::serve(listener, self.router()?)
            .await
            .context("HTTP server terminated")?;

        Ok(())
    }
}
