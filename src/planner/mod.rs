// ABOUTME: Meal planning core: preference normalization, recipe ranking, plan generation
// ABOUTME: Consumes the recipe/preference/meal-plan stores; owns no schema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! # Meal Planning Core
//!
//! The two non-trivial pieces of the application live here: the
//! suggestion engine that ranks recipe candidates against a user's
//! dietary restrictions and goals, and the generator that assembles a
//! multi-day meal plan from those candidates while keeping the saved
//! plan and the live calendar consistent.

/// Day-by-day meal plan generation
pub mod generator;
/// Preference normalization (legacy restriction/goal encodings)
pub mod profile;
/// Preference-biased recipe ranking
pub mod suggestions;

pub use generator::MealPlanGenerator;
pub use profile::{active_restrictions, goal_ordering, normalized_goals, restriction_tag, GoalOrdering};
pub use suggestions::SuggestionEngine;
