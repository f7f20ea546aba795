// ABOUTME: Integration tests for the meal plan generator
// ABOUTME: Tests slot coverage, rotation floor, dual-write mirroring, and overwrite semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

#![allow(missing_docs, clippy::unwrap_used)]

use chrono::NaiveDate;
use nutriplan::database::preferences::UpsertPreferencesRequest;
use nutriplan::database::recipes::{CreateRecipeRequest, Recipe};
use nutriplan::database::Database;
use nutriplan::planner::MealPlanGenerator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use std::collections::HashSet;

const USER: &str = "user-1";

/// Create a migrated in-memory test database
async fn create_test_db() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    let db = Database::from_pool(pool);
    db.migrate().await.unwrap();
    db
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

async fn seed_recipe(db: &Database, title: &str, tags: &[&str], calories: i64) -> Recipe {
    let request = CreateRecipeRequest {
        title: title.to_owned(),
        ingredients: vec!["stuff".to_owned()],
        instructions: "Cook it.".to_owned(),
        prep_time: Some(5),
        cook_time: Some(10),
        servings: Some(1),
        calories: Some(calories),
        protein: Some(20),
        carbs: Some(30),
        fat: Some(10),
        image_url: None,
        tags: tags.iter().map(|&t| t.to_owned()).collect(),
        is_public: true,
    };
    db.recipes().create("seed-user", &request).await.unwrap()
}

async fn set_vegan_weight_loss_prefs(db: &Database, snacks_per_day: i64) {
    let request = UpsertPreferencesRequest {
        dietary_restrictions: Some(json!(["Vegan"])),
        goals: Some(json!("weight_loss")),
        activity_level: None,
        meal_frequency: Some(3),
        snacks_per_day: Some(snacks_per_day),
    };
    db.preferences().upsert(USER, &request).await.unwrap();
}

// ============================================================================
// End-to-End Generation
// ============================================================================

#[tokio::test]
async fn test_generate_vegan_three_days_with_snack() {
    let db = create_test_db().await;
    let mut vegan_ids = HashSet::new();
    for i in 0..5 {
        let recipe =
            seed_recipe(&db, &format!("Vegan {i}"), &["vegan"], 300 + i * 50).await;
        vegan_ids.insert(recipe.id);
    }
    set_vegan_weight_loss_prefs(&db, 1).await;

    let generator = MealPlanGenerator::new(db.clone());
    let plan = generator.generate(USER, date(1), date(3)).await.unwrap();

    assert_eq!(plan.user_id, USER);
    assert_eq!(plan.name, "Meal Plan: 2025-06-01 to 2025-06-03");
    assert_eq!(plan.start_date, date(1));
    assert_eq!(plan.end_date, date(3));

    // 3 days x (3 meals + 1 snack) slots
    let saved_entries = db.meal_plans().saved_entries(plan.id).await.unwrap();
    assert_eq!(saved_entries.len(), 12);
    assert!(saved_entries
        .iter()
        .all(|e| vegan_ids.contains(&e.recipe_id.unwrap())));
    // Saved entries carry the macro snapshot, not a custom name
    assert!(saved_entries.iter().all(|e| e.custom_meal_name.is_none()));
    assert!(saved_entries.iter().all(|e| e.calories.is_some()));

    // Live calendar mirrors the same (date, meal type, recipe) tuples
    let live = db
        .meal_plans()
        .list_for_range(USER, date(1), date(3))
        .await
        .unwrap();
    assert_eq!(live.len(), 12);

    let saved_slots: HashSet<(NaiveDate, String, Option<i64>)> = saved_entries
        .iter()
        .map(|e| (e.date, e.meal_type.clone(), e.recipe_id))
        .collect();
    let live_slots: HashSet<(NaiveDate, String, Option<i64>)> = live
        .iter()
        .map(|e| (e.date, e.meal_type.clone(), e.recipe_id))
        .collect();
    assert_eq!(saved_slots, live_slots);

    // Live entries take the recipe title as their name
    assert!(live
        .iter()
        .all(|e| e.custom_meal_name.as_deref().unwrap().starts_with("Vegan ")));
}

#[tokio::test]
async fn test_slot_uniqueness_on_live_calendar() {
    let db = create_test_db().await;
    for i in 0..6 {
        seed_recipe(&db, &format!("Recipe {i}"), &[], 400).await;
    }
    set_vegan_weight_loss_prefs(&db, 3).await;

    let generator = MealPlanGenerator::new(db.clone());
    generator.generate(USER, date(1), date(4)).await.unwrap();

    let live = db
        .meal_plans()
        .list_for_range(USER, date(1), date(4))
        .await
        .unwrap();

    // At most days x (3 base + 3 snacks) entries, and no slot repeats.
    // The three snack slots share one (date, "snack") key, so the live
    // calendar collapses them to a single entry per day.
    assert!(live.len() <= 4 * 6);
    let slots: HashSet<(NaiveDate, String)> = live
        .iter()
        .map(|e| (e.date, e.meal_type.clone()))
        .collect();
    assert_eq!(slots.len(), live.len());
}

// ============================================================================
// Pool Behavior
// ============================================================================

#[tokio::test]
async fn test_rotation_floor_keeps_short_pools_alive() {
    let db = create_test_db().await;
    for i in 0..3 {
        seed_recipe(&db, &format!("Recipe {i}"), &[], 350).await;
    }
    // No preferences: 3 base meal slots per day

    let generator = MealPlanGenerator::new(db.clone());
    let plan = generator.generate(USER, date(1), date(10)).await.unwrap();

    // 10 days x 3 meals: every slot filled because the pool never
    // shrinks below three recipes
    let saved_entries = db.meal_plans().saved_entries(plan.id).await.unwrap();
    assert_eq!(saved_entries.len(), 30);
    assert!(saved_entries.iter().all(|e| e.recipe_id.is_some()));

    // Only the three seeded recipes rotate through the plan
    let distinct: HashSet<Option<i64>> = saved_entries.iter().map(|e| e.recipe_id).collect();
    assert_eq!(distinct.len(), 3);
}

#[tokio::test]
async fn test_empty_pool_generates_plan_with_no_entries() {
    let db = create_test_db().await;

    let generator = MealPlanGenerator::new(db.clone());
    let plan = generator.generate(USER, date(1), date(3)).await.unwrap();

    assert!(db.meal_plans().saved_entries(plan.id).await.unwrap().is_empty());
    assert!(db
        .meal_plans()
        .list_for_range(USER, date(1), date(3))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_reversed_range_produces_empty_plan() {
    let db = create_test_db().await;
    for i in 0..5 {
        seed_recipe(&db, &format!("Recipe {i}"), &[], 400).await;
    }

    let generator = MealPlanGenerator::new(db.clone());
    let plan = generator.generate(USER, date(9), date(1)).await.unwrap();

    assert!(db.meal_plans().saved_entries(plan.id).await.unwrap().is_empty());
}

// ============================================================================
// Overwrite Semantics
// ============================================================================

#[tokio::test]
async fn test_regeneration_overwrites_live_but_accumulates_saved() {
    let db = create_test_db().await;
    for i in 0..6 {
        seed_recipe(&db, &format!("Recipe {i}"), &[], 400).await;
    }

    let generator = MealPlanGenerator::new(db.clone());
    generator.generate(USER, date(1), date(2)).await.unwrap();
    generator.generate(USER, date(1), date(2)).await.unwrap();

    // Saved plans accumulate
    assert_eq!(db.meal_plans().list_saved(USER).await.unwrap().len(), 2);

    // The live calendar is overwritten, not appended to: 2 days x 3 meals
    let live = db
        .meal_plans()
        .list_for_range(USER, date(1), date(2))
        .await
        .unwrap();
    assert_eq!(live.len(), 6);
}

#[tokio::test]
async fn test_generation_replaces_manual_live_entries_in_range() {
    let db = create_test_db().await;
    for i in 0..5 {
        seed_recipe(&db, &format!("Recipe {i}"), &[], 400).await;
    }

    // A manual entry inside the range and one outside it
    let manual_inside = nutriplan::database::meal_plans::UpsertMealPlanRequest {
        date: date(2),
        meal_type: "lunch".to_owned(),
        recipe_id: None,
        custom_meal_name: Some("Leftovers".to_owned()),
        calories: None,
        protein: None,
        carbs: None,
        fat: None,
    };
    db.meal_plans().upsert(USER, &manual_inside).await.unwrap();

    let manual_outside = nutriplan::database::meal_plans::UpsertMealPlanRequest {
        date: date(9),
        meal_type: "lunch".to_owned(),
        recipe_id: None,
        custom_meal_name: Some("Pizza Night".to_owned()),
        calories: None,
        protein: None,
        carbs: None,
        fat: None,
    };
    db.meal_plans().upsert(USER, &manual_outside).await.unwrap();

    let generator = MealPlanGenerator::new(db.clone());
    generator.generate(USER, date(1), date(3)).await.unwrap();

    // The in-range manual entry was replaced by a generated one
    let in_range = db
        .meal_plans()
        .list_for_range(USER, date(2), date(2))
        .await
        .unwrap();
    assert!(in_range
        .iter()
        .all(|e| e.custom_meal_name.as_deref() != Some("Leftovers")));

    // The out-of-range entry survives
    let outside = db
        .meal_plans()
        .list_for_range(USER, date(9), date(9))
        .await
        .unwrap();
    assert_eq!(outside.len(), 1);
    assert_eq!(outside[0].custom_meal_name.as_deref(), Some("Pizza Night"));
}

// ============================================================================
// Injected Randomness
// ============================================================================

#[tokio::test]
async fn test_seeded_rng_is_deterministic() {
    // With five tag-matched recipes the candidate pool is fully
    // deterministic (the dietary pass orders by creation time), so a
    // fixed seed must reproduce the same assignment.
    async fn run(seed: u64) -> Vec<(NaiveDate, String, Option<i64>)> {
        let db = create_test_db().await;
        for i in 0..5 {
            seed_recipe(&db, &format!("Vegan {i}"), &["vegan"], 300 + i * 10).await;
        }
        set_vegan_weight_loss_prefs(&db, 0).await;

        let generator = MealPlanGenerator::new(db.clone());
        let mut rng = StdRng::seed_from_u64(seed);
        let plan = generator
            .generate_with_rng(USER, date(1), date(4), &mut rng)
            .await
            .unwrap();

        db.meal_plans()
            .saved_entries(plan.id)
            .await
            .unwrap()
            .iter()
            .map(|e| (e.date, e.meal_type.clone(), e.recipe_id))
            .collect()
    }

    let first = run(42).await;
    let second = run(42).await;
    assert_eq!(first.len(), 12);
    assert_eq!(first, second);
}
