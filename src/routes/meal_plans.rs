// ABOUTME: Route handlers for the live calendar, saved plans, and plan generation
// ABOUTME: Generation validates the date range at the boundary before invoking the planner
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! Meal plan routes
//!
//! The live calendar is keyed uniquely per (user, date, meal type) and
//! written with upsert semantics. Saved plans accumulate and can be
//! loaded later; their entries stay displayable even when a referenced
//! recipe has since been deleted.

use crate::{
    database::meal_plans::{SavedMealPlan, SavedMealPlanEntry, UpsertMealPlanRequest},
    errors::AppError,
    planner::MealPlanGenerator,
    routes::require_user,
    server::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for listing the live calendar
#[derive(Debug, Deserialize, Default)]
pub struct ListMealPlansQuery {
    /// Week offset relative to the current Monday-based week
    pub week_offset: Option<i64>,
}

/// Request body for meal plan generation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateMealPlanBody {
    /// First day of the plan (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Last day of the plan, inclusive (YYYY-MM-DD)
    pub end_date: Option<String>,
}

/// A saved plan together with its entries
#[derive(Debug, Serialize)]
pub struct SavedPlanDetailResponse {
    /// The saved plan
    #[serde(flatten)]
    pub plan: SavedMealPlan,
    /// Slot entries, ordered by date then meal type
    pub entries: Vec<SavedMealPlanEntry>,
}

/// Response for deletions
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Meal plan routes handler
pub struct MealPlanRoutes;

impl MealPlanRoutes {
    /// Create all meal plan routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/meal-plans", get(Self::handle_list))
            .route("/api/meal-plans", post(Self::handle_upsert))
            .route("/api/meal-plans/generate", post(Self::handle_generate))
            .route("/api/meal-plans/saved", get(Self::handle_list_saved))
            .route("/api/meal-plans/saved/:id", get(Self::handle_get_saved))
            .route(
                "/api/meal-plans/saved/:id",
                delete(Self::handle_delete_saved),
            )
            .route("/api/meal-plans/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle GET /api/meal-plans - live entries for a Monday-based week
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListMealPlansQuery>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;
        let offset = query.week_offset.unwrap_or(0);

        let today = Utc::now().date_naive();
        let days_from_monday = i64::from(today.weekday().num_days_from_monday());
        let start_date = today - Duration::days(days_from_monday) + Duration::weeks(offset);
        let end_date = start_date + Duration::days(6);

        let entries = resources
            .database
            .meal_plans()
            .list_for_range(&user_id, start_date, end_date)
            .await?;

        Ok((StatusCode::OK, Json(entries)).into_response())
    }

    /// Handle POST /api/meal-plans - upsert one live calendar slot
    async fn handle_upsert(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<UpsertMealPlanRequest>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let entry = resources.database.meal_plans().upsert(&user_id, &body).await?;

        Ok((StatusCode::OK, Json(entry)).into_response())
    }

    /// Handle POST /api/meal-plans/generate - generate a plan for a range
    ///
    /// Missing or malformed dates are rejected here, before the
    /// generator runs.
    async fn handle_generate(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<GenerateMealPlanBody>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let start_date = parse_required_date(body.start_date.as_deref(), "startDate")?;
        let end_date = parse_required_date(body.end_date.as_deref(), "endDate")?;

        let generator = MealPlanGenerator::new(resources.database.clone());
        let plan = generator.generate(&user_id, start_date, end_date).await?;

        Ok((StatusCode::OK, Json(plan)).into_response())
    }

    /// Handle DELETE /api/meal-plans/:id - remove one live entry
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let entry = resources
            .database
            .meal_plans()
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Meal plan {id}")))?;

        if entry.user_id != user_id {
            return Err(AppError::permission_denied(
                "Not authorized to delete this meal plan",
            ));
        }

        resources.database.meal_plans().delete(id).await?;

        let response = MessageResponse {
            message: "Meal plan deleted successfully".to_owned(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle GET /api/meal-plans/saved - list the user's saved plans
    async fn handle_list_saved(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let plans = resources.database.meal_plans().list_saved(&user_id).await?;

        Ok((StatusCode::OK, Json(plans)).into_response())
    }

    /// Handle GET /api/meal-plans/saved/:id - load a saved plan with entries
    async fn handle_get_saved(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let plan = Self::fetch_owned_saved(&resources, id, &user_id).await?;
        let entries = resources.database.meal_plans().saved_entries(id).await?;

        let response = SavedPlanDetailResponse { plan, entries };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Handle DELETE /api/meal-plans/saved/:id - delete a saved plan
    async fn handle_delete_saved(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        Self::fetch_owned_saved(&resources, id, &user_id).await?;
        resources.database.meal_plans().delete_saved(id).await?;

        let response = MessageResponse {
            message: "Saved meal plan deleted successfully".to_owned(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Fetch a saved plan owned by the caller
    async fn fetch_owned_saved(
        resources: &Arc<ServerResources>,
        plan_id: i64,
        user_id: &str,
    ) -> Result<SavedMealPlan, AppError> {
        let plan = resources
            .database
            .meal_plans()
            .get_saved(plan_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Saved meal plan {plan_id}")))?;

        if plan.user_id != user_id {
            return Err(AppError::permission_denied(
                "Not authorized to access this meal plan",
            ));
        }

        Ok(plan)
    }
}

/// Parse a required YYYY-MM-DD date field
fn parse_required_date(value: Option<&str>, field: &str) -> Result<NaiveDate, AppError> {
    let value = value.ok_or_else(|| AppError::missing_field(field))?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::invalid_format(format!("Invalid date for {field}: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_required_date() {
        assert!(parse_required_date(Some("2025-06-01"), "startDate").is_ok());
        assert!(parse_required_date(None, "startDate").is_err());
        assert!(parse_required_date(Some("06/01/2025"), "startDate").is_err());
    }
}
