// ABOUTME: Day-by-day meal plan generation from ranked recipe candidates
// ABOUTME: Dual-writes a saved plan and the live calendar from the same selections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! Meal plan generator
//!
//! Assembles a (date, meal type) assignment covering an inclusive date
//! range and persists it twice: as a durable saved plan with entries,
//! and as live calendar entries for the same range. Both writes for a
//! slot happen adjacently; the run is not transactional, so a write
//! failure leaves already-committed entries in place and surfaces as a
//! generation failure.

use crate::database::meal_plans::{NewSavedEntry, SavedMealPlan, UpsertMealPlanRequest};
use crate::database::Database;
use crate::errors::AppResult;
use crate::planner::suggestions::SuggestionEngine;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

/// Meal types every day receives, in slot order
const BASE_MEAL_TYPES: [&str; 3] = ["breakfast", "lunch", "dinner"];

/// Cap on snack slots per day regardless of configured snacks-per-day
const MAX_SNACK_SLOTS: i64 = 3;

/// Selected recipes stay in the pool once it shrinks to this size, so
/// short pools rotate instead of running dry
const POOL_ROTATION_FLOOR: usize = 3;

/// Pools smaller than this are topped up with random public recipes
const POOL_TOP_UP_THRESHOLD: usize = 5;

/// Number of random public recipes fetched for a top-up
const POOL_TOP_UP_LIMIT: i64 = 10;

/// Meal plan generator
pub struct MealPlanGenerator {
    database: Database,
}

impl MealPlanGenerator {
    /// Create a new generator
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Generate a meal plan with an entropy-seeded RNG
    ///
    /// # Errors
    ///
    /// Returns an error if creating the saved plan or writing any slot
    /// entry fails. Entries written before the failure are not rolled
    /// back.
    pub async fn generate(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<SavedMealPlan> {
        let mut rng = StdRng::from_entropy();
        self.generate_with_rng(user_id, start_date, end_date, &mut rng)
            .await
    }

    /// Generate a meal plan using the supplied randomness source
    ///
    /// A reversed date range iterates zero days and produces a plan with
    /// no entries rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error if creating the saved plan or writing any slot
    /// entry fails. Entries written before the failure are not rolled
    /// back.
    pub async fn generate_with_rng<R: Rng + Send>(
        &self,
        user_id: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        rng: &mut R,
    ) -> AppResult<SavedMealPlan> {
        info!("Generating meal plan for user {user_id} from {start_date} to {end_date}");

        let meal_plans = self.database.meal_plans();
        let recipes = self.database.recipes();

        // The saved plan row is created first so entries can reference it.
        let plan_name = format!("Meal Plan: {start_date} to {end_date}");
        let plan = meal_plans
            .create_saved(
                user_id,
                &plan_name,
                Some("Generated meal plan based on your preferences and available recipes"),
                start_date,
                end_date,
            )
            .await?;

        let prefs = self.database.preferences().get(user_id).await?;
        let meal_types = slot_meal_types(prefs.as_ref().map_or(0, |p| p.snacks_per_day));

        // Candidate pool from the suggestion engine, topped up with
        // random public recipes when short to reduce repetition.
        let suggestions = SuggestionEngine::new(self.database.clone());
        let mut pool = suggestions.suggest(user_id).await;
        if pool.len() < POOL_TOP_UP_THRESHOLD {
            let extra = recipes.random_public(POOL_TOP_UP_LIMIT).await?;
            pool.extend(extra);
        }
        info!("Got {} recipes for meal planning", pool.len());

        // Generation overwrites the live calendar for the range. A failed
        // cleanup is logged but does not abort the run; at worst stale
        // entries outside the regenerated slots remain.
        if let Err(e) = meal_plans
            .delete_range(user_id, start_date, end_date)
            .await
        {
            warn!("Failed to clear meal plans for {start_date} to {end_date}: {e}");
        }

        let mut date = start_date;
        while date <= end_date {
            for meal_type in &meal_types {
                if pool.is_empty() {
                    continue;
                }

                pool.shuffle(rng);
                let selected = pool[0].clone();

                let entry = NewSavedEntry {
                    date,
                    meal_type: (*meal_type).to_owned(),
                    recipe_id: Some(selected.id),
                    custom_meal_name: None,
                    calories: selected.calories,
                    protein: selected.protein,
                    carbs: selected.carbs,
                    fat: selected.fat,
                };
                meal_plans.create_saved_entry(plan.id, &entry).await?;

                // The live calendar mirrors the saved entry for this slot.
                let live = UpsertMealPlanRequest {
                    date,
                    meal_type: (*meal_type).to_owned(),
                    recipe_id: Some(selected.id),
                    custom_meal_name: Some(selected.title.clone()),
                    calories: selected.calories,
                    protein: selected.protein,
                    carbs: selected.carbs,
                    fat: selected.fat,
                };
                if let Err(e) = meal_plans.upsert(user_id, &live).await {
                    warn!(
                        "Slot {date}/{meal_type} partially written: saved entry committed, live upsert failed"
                    );
                    return Err(e);
                }

                if pool.len() > POOL_ROTATION_FLOOR {
                    pool.remove(0);
                }
            }

            let Some(next) = date.succ_opt() else { break };
            date = next;
        }

        info!("Successfully generated meal plan {}", plan.id);
        Ok(plan)
    }
}

/// Meal-type slots for one day: the three base meals plus one snack
/// slot per configured snack, capped
fn slot_meal_types(snacks_per_day: i64) -> Vec<&'static str> {
    let mut meal_types: Vec<&'static str> = BASE_MEAL_TYPES.to_vec();
    for _ in 0..snacks_per_day.clamp(0, MAX_SNACK_SLOTS) {
        meal_types.push("snack");
    }
    meal_types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_meal_types_no_snacks() {
        assert_eq!(slot_meal_types(0), vec!["breakfast", "lunch", "dinner"]);
    }

    #[test]
    fn test_slot_meal_types_with_snacks() {
        assert_eq!(
            slot_meal_types(2),
            vec!["breakfast", "lunch", "dinner", "snack", "snack"]
        );
    }

    #[test]
    fn test_slot_meal_types_caps_snacks() {
        assert_eq!(slot_meal_types(10).len(), 6);
    }

    #[test]
    fn test_slot_meal_types_negative_snacks() {
        assert_eq!(slot_meal_types(-1).len(), 3);
    }
}
