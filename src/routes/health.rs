// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Provides the liveness endpoint used by load balancers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! Health check routes for service monitoring

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    #[must_use]
    pub fn routes() -> axum::Router {
        use axum::{routing::get, Router};

        async fn health_handler() -> &'static str {
            "OK"
        }

        Router::new().route("/api/health", get(health_handler))
    }
}
