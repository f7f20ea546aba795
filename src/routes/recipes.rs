// ABOUTME: Route handlers for the recipes REST API
// ABOUTME: Public browsing, owner CRUD, recents, and preference-ranked suggestions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! Recipe routes
//!
//! Browsing covers public recipes; mutation is owner-only. The
//! suggested-recipes endpoint exposes the planner's suggestion engine.

use crate::{
    database::recipes::{CreateRecipeRequest, ListRecipesFilter, Recipe, UpdateRecipeRequest},
    errors::AppError,
    planner::SuggestionEngine,
    routes::require_user,
    server::ServerResources,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query parameters for listing public recipes
#[derive(Debug, Deserialize, Default)]
pub struct ListRecipesQuery {
    /// Case-insensitive title substring
    pub search: Option<String>,
    /// Tag the recipe must carry
    pub category: Option<String>,
}

/// Query parameters for listing the user's own recipes
#[derive(Debug, Deserialize, Default)]
pub struct MyRecipesQuery {
    /// Case-insensitive title substring
    pub search: Option<String>,
}

/// Response for recipe deletion
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable confirmation
    pub message: String,
}

/// Recipes routes handler
pub struct RecipeRoutes;

impl RecipeRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/recipes", get(Self::handle_list))
            .route("/api/recipes", post(Self::handle_create))
            .route("/api/recipes/my", get(Self::handle_list_my))
            .route("/api/recipes/recent", get(Self::handle_recent))
            .route("/api/recipes/suggested", get(Self::handle_suggested))
            .route("/api/recipes/:id", get(Self::handle_get))
            .route("/api/recipes/:id", patch(Self::handle_update))
            .route("/api/recipes/:id", delete(Self::handle_delete))
            .with_state(resources)
    }

    /// Handle GET /api/recipes - browse public recipes
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListRecipesQuery>,
    ) -> Result<Response, AppError> {
        require_user(&headers)?;

        let filter = ListRecipesFilter {
            search: query.search,
            category: query.category,
        };
        let recipes = resources.database.recipes().list_public(&filter).await?;

        Ok((StatusCode::OK, Json(recipes)).into_response())
    }

    /// Handle GET /api/recipes/my - list the user's own recipes
    async fn handle_list_my(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<MyRecipesQuery>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let recipes = resources
            .database
            .recipes()
            .list_for_user(&user_id, query.search.as_deref())
            .await?;

        Ok((StatusCode::OK, Json(recipes)).into_response())
    }

    /// Handle GET /api/recipes/recent - recent recipes with public top-up
    async fn handle_recent(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let recipes = resources.database.recipes().recent_for_user(&user_id).await?;

        Ok((StatusCode::OK, Json(recipes)).into_response())
    }

    /// Handle GET /api/recipes/suggested - preference-ranked suggestions
    ///
    /// An empty array means "no suggestions available"; ranking failures
    /// never surface as HTTP errors.
    async fn handle_suggested(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let engine = SuggestionEngine::new(resources.database.clone());
        let recipes = engine.suggest(&user_id).await;

        Ok((StatusCode::OK, Json(recipes)).into_response())
    }

    /// Handle GET /api/recipes/:id - fetch a single recipe
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let recipe = Self::fetch_visible(&resources, id, &user_id).await?;
        Ok((StatusCode::OK, Json(recipe)).into_response())
    }

    /// Handle POST /api/recipes - create a recipe owned by the caller
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(body): Json<CreateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        let recipe = resources.database.recipes().create(&user_id, &body).await?;

        Ok((StatusCode::CREATED, Json(recipe)).into_response())
    }

    /// Handle PATCH /api/recipes/:id - update an owned recipe
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
        Json(body): Json<UpdateRecipeRequest>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        Self::fetch_owned(&resources, id, &user_id).await?;

        let updated = resources
            .database
            .recipes()
            .update(id, &body)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")))?;

        Ok((StatusCode::OK, Json(updated)).into_response())
    }

    /// Handle DELETE /api/recipes/:id - delete an owned recipe
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(id): Path<i64>,
    ) -> Result<Response, AppError> {
        let user_id = require_user(&headers)?;

        Self::fetch_owned(&resources, id, &user_id).await?;
        resources.database.recipes().delete(id).await?;

        let response = MessageResponse {
            message: "Recipe deleted successfully".to_owned(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }

    /// Fetch a recipe the caller may view: public, or owned by them
    async fn fetch_visible(
        resources: &Arc<ServerResources>,
        recipe_id: i64,
        user_id: &str,
    ) -> Result<Recipe, AppError> {
        let recipe = resources
            .database
            .recipes()
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))?;

        if !recipe.is_public && recipe.user_id != user_id {
            return Err(AppError::permission_denied(
                "Not authorized to view this recipe",
            ));
        }

        Ok(recipe)
    }

    /// Fetch a recipe the caller may mutate: owned by them
    async fn fetch_owned(
        resources: &Arc<ServerResources>,
        recipe_id: i64,
        user_id: &str,
    ) -> Result<Recipe, AppError> {
        let recipe = resources
            .database
            .recipes()
            .get(recipe_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe {recipe_id}")))?;

        if recipe.user_id != user_id {
            return Err(AppError::permission_denied(
                "Not authorized to modify this recipe",
            ));
        }

        Ok(recipe)
    }
}
