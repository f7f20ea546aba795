// ABOUTME: Route module organization for NutriPlan HTTP endpoints
// ABOUTME: Route definitions grouped by domain with thin handlers delegating to managers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! Route module for the NutriPlan server
//!
//! Each domain module contains route definitions and thin handler
//! functions that delegate to the database managers and the planner.
//! Session handling is outside this service; requests carry the
//! authenticated user id in the `x-user-id` header, placed there by the
//! session-terminating boundary in front of the API.

/// Health check routes
pub mod health;
/// Live calendar, saved plan, and generation routes
pub mod meal_plans;
/// User preference routes
pub mod preferences;
/// Recipe browsing, CRUD, and suggestion routes
pub mod recipes;

pub use health::HealthRoutes;
pub use meal_plans::MealPlanRoutes;
pub use preferences::PreferenceRoutes;
pub use recipes::RecipeRoutes;

use crate::errors::AppError;
use axum::http::HeaderMap;

/// Extract the authenticated user id from the `x-user-id` header
///
/// # Errors
///
/// Returns an authentication error if the header is missing or empty
pub fn require_user(headers: &HeaderMap) -> Result<String, AppError> {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .filter(|id| !id.is_empty())
        .ok_or_else(AppError::auth_required)
}
