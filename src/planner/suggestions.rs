// ABOUTME: Preference-biased recipe ranking for the suggested-recipes feature
// ABOUTME: Dietary tag matches first, goal-ordered picks second, random filler last
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! Recipe suggestion engine
//!
//! Produces an ordered list of up to eight candidate recipes for a user.
//! Pass ordering encodes the ranking: dietary-restriction tag matches
//! rank highest, goal-based nutrient ordering second, random public
//! filler last. The engine always returns something usable: a user
//! without preferences gets random public recipes, and storage failures
//! degrade to a smaller random query and finally to an empty list.

use crate::database::recipes::Recipe;
use crate::database::Database;
use crate::errors::AppResult;
use crate::planner::profile::{
    active_restrictions, goal_ordering, normalized_goals, restriction_tag, GoalOrdering,
};
use std::collections::HashSet;
use tracing::{error, warn};

/// Maximum number of suggestions returned per call
pub const MAX_SUGGESTIONS: usize = 8;

/// Dietary-restriction matches taken before goal-based picks
const DIETARY_PASS_LIMIT: i64 = 5;

/// Size of the best-effort random query used when ranking fails
const ERROR_FALLBACK_LIMIT: i64 = 4;

/// Recipe suggestion engine
pub struct SuggestionEngine {
    database: Database,
}

impl SuggestionEngine {
    /// Create a new suggestion engine
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Produce up to eight suggested recipes for a user
    ///
    /// Never fails: storage errors degrade to a best-effort random
    /// query, and if that also fails the result is empty. Callers must
    /// treat an empty list as "no suggestions available". Randomized
    /// passes make repeated calls non-deterministic by design.
    pub async fn suggest(&self, user_id: &str) -> Vec<Recipe> {
        match self.ranked(user_id).await {
            Ok(recipes) => recipes,
            Err(e) => {
                warn!("Suggestion ranking failed for user {user_id}: {e}");
                match self
                    .database
                    .recipes()
                    .random_public(ERROR_FALLBACK_LIMIT)
                    .await
                {
                    Ok(recipes) => recipes,
                    Err(e) => {
                        error!("Suggestion fallback query failed for user {user_id}: {e}");
                        Vec::new()
                    }
                }
            }
        }
    }

    /// Run the three ranking passes
    async fn ranked(&self, user_id: &str) -> AppResult<Vec<Recipe>> {
        let recipes = self.database.recipes();
        let prefs = self.database.preferences().get(user_id).await?;

        // No stated preferences: nothing to rank against.
        let Some(prefs) = prefs else {
            return recipes.random_public(MAX_SUGGESTIONS as i64).await;
        };

        let mut results: Vec<Recipe> = Vec::new();
        let mut seen: HashSet<i64> = HashSet::new();

        // Dietary pass: public recipes whose tags intersect the derived
        // restriction tags, newest first.
        let restriction_tags: Vec<String> =
            active_restrictions(prefs.dietary_restrictions.as_ref())
                .iter()
                .map(|name| restriction_tag(name))
                .collect();
        if !restriction_tags.is_empty() {
            for recipe in recipes
                .public_with_any_tag(&restriction_tags, DIETARY_PASS_LIMIT)
                .await?
            {
                if seen.insert(recipe.id) {
                    results.push(recipe);
                }
            }
        }

        // Goal pass: nutrient ordering chosen by substring matching on
        // the normalized goals.
        if results.len() < MAX_SUGGESTIONS {
            let goals = normalized_goals(prefs.goals.as_deref());
            let remaining = (MAX_SUGGESTIONS - results.len()) as i64;
            let goal_results = match goal_ordering(&goals) {
                Some(GoalOrdering::CalorieAscending) => {
                    recipes.public_by_calories_asc(remaining).await?
                }
                Some(GoalOrdering::ProteinDescending) => {
                    recipes.public_by_protein_desc(remaining).await?
                }
                None => Vec::new(),
            };
            for recipe in goal_results {
                if seen.insert(recipe.id) {
                    results.push(recipe);
                }
            }
        }

        // Random filler keeps the list usable when the passes came up short.
        if results.len() < MAX_SUGGESTIONS {
            let remaining = (MAX_SUGGESTIONS - results.len()) as i64;
            for recipe in recipes.random_public(remaining).await? {
                if seen.insert(recipe.id) {
                    results.push(recipe);
                }
            }
        }

        Ok(results)
    }
}
