// ABOUTME: Route handlers for user dietary preferences
// ABOUTME: One preferences record per user, created or replaced via upsert
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! User preference routes

use crate::{
    database::preferences::UpsertPreferencesRequest, errors::AppError, routes::require_user,
    server::ServerResources,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Preference routes handler
pub struct PreferenceRoutes;

impl PreferenceRoutes {
    /// Create all preference routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/preferences", get(Self::handle_get))
            .route("/api/preferences", post(Self::handle_upsert))
            .with_state(resources)
    }

    /// Handle GET /api/preferences - fetch the user's preferences
    ///
    /// Returns an empty object when no preferences record exists.
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let preferences = resources.database.preferences().get(&user_id).await?;

        let body = match preferences {
            Some(preferences) => serde_json::to_value(preferences)?,
            None => serde_json::Value::Object(serde_json::Map::new()),
        };

        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle POST /api/preferences - create or replace preferences
    async fn handle_upsert(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<UpsertPreferencesRequest>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let preferences = resources
            .database
            .preferences()
            .upsert(&user_id, &body)
            .await?;

        Ok((StatusCode::OK, Json(preferences)).into_response())
    }
}
