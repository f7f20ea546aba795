// ABOUTME: Unit tests for the meal plans database module
// ABOUTME: Tests live-entry upsert uniqueness, range operations, and saved plan lifecycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

#![allow(missing_docs, clippy::unwrap_used)]

use chrono::NaiveDate;
use nutriplan::database::meal_plans::{NewSavedEntry, UpsertMealPlanRequest};
use nutriplan::database::recipes::CreateRecipeRequest;
use nutriplan::database::Database;
use sqlx::sqlite::SqlitePoolOptions;

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

fn slot_request(day: u32, meal_type: &str, name: &str) -> UpsertMealPlanRequest {
    UpsertMealPlanRequest {
        date: date(day),
        meal_type: meal_type.to_owned(),
        recipe_id: None,
        custom_meal_name: Some(name.to_owned()),
        calories: Some(400),
        protein: Some(20),
        carbs: Some(40),
        fat: Some(15),
    }
}

// ============================================================================
// Live Calendar Tests
// ============================================================================

#[tokio::test]
async fn test_upsert_creates_then_replaces_same_slot() {
    let db = create_test_db().await;
    let meal_plans = db.meal_plans();

    let first = meal_plans
        .upsert("user-1", &slot_request(1, "lunch", "Soup"))
        .await
        .unwrap();
    let second = meal_plans
        .upsert("user-1", &slot_request(1, "lunch", "Salad"))
        .await
        .unwrap();

    // Same row updated, not a duplicate
    assert_eq!(second.id, first.id);
    assert_eq!(second.custom_meal_name.as_deref(), Some("Salad"));

    let entries = meal_plans
        .list_for_range("user-1", date(1), date(1))
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_upsert_distinct_slots_coexist() {
    let db = create_test_db().await;
    let meal_plans = db.meal_plans();

    meal_plans
        .upsert("user-1", &slot_request(1, "breakfast", "Eggs"))
        .await
        .unwrap();
    meal_plans
        .upsert("user-1", &slot_request(1, "lunch", "Wrap"))
        .await
        .unwrap();
    meal_plans
        .upsert("user-1", &slot_request(2, "breakfast", "Oats"))
        .await
        .unwrap();

    let entries = meal_plans
        .list_for_range("user-1", date(1), date(2))
        .await
        .unwrap();
    assert_eq!(entries.len(), 3);
}

#[tokio::test]
async fn test_slots_are_per_user() {
    let db = create_test_db().await;
    let meal_plans = db.meal_plans();

    meal_plans
        .upsert("user-1", &slot_request(1, "dinner", "Pasta"))
        .await
        .unwrap();
    meal_plans
        .upsert("user-2", &slot_request(1, "dinner", "Curry"))
        .await
        .unwrap();

    let mine = meal_plans
        .list_for_range("user-1", date(1), date(1))
        .await
        .unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].custom_meal_name.as_deref(), Some("Pasta"));
}

#[tokio::test]
async fn test_list_for_range_is_inclusive() {
    let db = create_test_db().await;
    let meal_plans = db.meal_plans();

    for day in 1..=4 {
        meal_plans
            .upsert("user-1", &slot_request(day, "lunch", "Meal"))
            .await
            .unwrap();
    }

    let entries = meal_plans
        .list_for_range("user-1", date(2), date(3))
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].date, date(2));
    assert_eq!(entries[1].date, date(3));
}

#[tokio::test]
async fn test_delete_range_spares_outside_entries() {
    let db = create_test_db().await;
    let meal_plans = db.meal_plans();

    for day in 1..=5 {
        meal_plans
            .upsert("user-1", &slot_request(day, "dinner", "Meal"))
            .await
            .unwrap();
    }

    let deleted = meal_plans
        .delete_range("user-1", date(2), date(4))
        .await
        .unwrap();
    assert_eq!(deleted, 3);

    let remaining = meal_plans
        .list_for_range("user-1", date(1), date(5))
        .await
        .unwrap();
    let days: Vec<NaiveDate> = remaining.iter().map(|e| e.date).collect();
    assert_eq!(days, vec![date(1), date(5)]);
}

// ============================================================================
// Saved Plan Tests
// ============================================================================

#[tokio::test]
async fn test_saved_plan_create_and_list_newest_first() {
    let db = create_test_db().await;
    let meal_plans = db.meal_plans();

    let first = meal_plans
        .create_saved("user-1", "Week A", None, date(1), date(7))
        .await
        .unwrap();
    let second = meal_plans
        .create_saved("user-1", "Week B", Some("second week"), date(8), date(14))
        .await
        .unwrap();

    let listed = meal_plans.list_saved("user-1").await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[tokio::test]
async fn test_saved_plans_accumulate_never_upsert() {
    let db = create_test_db().await;
    let meal_plans = db.meal_plans();

    meal_plans
        .create_saved("user-1", "Same Range", None, date(1), date(3))
        .await
        .unwrap();
    meal_plans
        .create_saved("user-1", "Same Range", None, date(1), date(3))
        .await
        .unwrap();

    assert_eq!(meal_plans.list_saved("user-1").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_saved_entries_ordered_by_date_then_meal_type() {
    let db = create_test_db().await;
    let meal_plans = db.meal_plans();

    let plan = meal_plans
        .create_saved("user-1", "Plan", None, date(1), date(2))
        .await
        .unwrap();

    for (day, meal_type) in [(2, "lunch"), (1, "lunch"), (1, "breakfast")] {
        let entry = NewSavedEntry {
            date: date(day),
            meal_type: meal_type.to_owned(),
            recipe_id: None,
            custom_meal_name: Some("Meal".to_owned()),
            calories: Some(300),
            protein: Some(15),
            carbs: Some(30),
            fat: Some(10),
        };
        meal_plans.create_saved_entry(plan.id, &entry).await.unwrap();
    }

    let entries = meal_plans.saved_entries(plan.id).await.unwrap();
    let order: Vec<(NaiveDate, String)> = entries
        .iter()
        .map(|e| (e.date, e.meal_type.clone()))
        .collect();
    assert_eq!(
        order,
        vec![
            (date(1), "breakfast".to_owned()),
            (date(1), "lunch".to_owned()),
            (date(2), "lunch".to_owned()),
        ]
    );
}

#[tokio::test]
async fn test_delete_saved_plan_removes_entries() {
    let db = create_test_db().await;
    let meal_plans = db.meal_plans();

    let plan = meal_plans
        .create_saved("user-1", "Plan", None, date(1), date(1))
        .await
        .unwrap();
    let entry = NewSavedEntry {
        date: date(1),
        meal_type: "dinner".to_owned(),
        recipe_id: None,
        custom_meal_name: None,
        calories: None,
        protein: None,
        carbs: None,
        fat: None,
    };
    meal_plans.create_saved_entry(plan.id, &entry).await.unwrap();

    assert!(meal_plans.delete_saved(plan.id).await.unwrap());
    assert!(meal_plans.get_saved(plan.id).await.unwrap().is_none());
    assert!(meal_plans.saved_entries(plan.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_saved_entries_survive_recipe_deletion() {
    let db = create_test_db().await;
    let meal_plans = db.meal_plans();
    let recipes = db.recipes();

    let recipe = recipes
        .create(
            "user-1",
            &CreateRecipeRequest {
                title: "Doomed Dish".to_owned(),
                ingredients: vec!["air".to_owned()],
                instructions: "None.".to_owned(),
                prep_time: None,
                cook_time: None,
                servings: None,
                calories: Some(250),
                protein: Some(12),
                carbs: Some(20),
                fat: Some(9),
                image_url: None,
                tags: Vec::new(),
                is_public: true,
            },
        )
        .await
        .unwrap();

    let plan = meal_plans
        .create_saved("user-1", "Plan", None, date(1), date(1))
        .await
        .unwrap();
    let entry = NewSavedEntry {
        date: date(1),
        meal_type: "lunch".to_owned(),
        recipe_id: Some(recipe.id),
        custom_meal_name: None,
        calories: recipe.calories,
        protein: recipe.protein,
        carbs: recipe.carbs,
        fat: recipe.fat,
    };
    meal_plans.create_saved_entry(plan.id, &entry).await.unwrap();

    // Deleting the recipe leaves a dangling reference; the entry keeps
    // its macro snapshot and remains readable.
    recipes.delete(recipe.id).await.unwrap();

    let entries = meal_plans.saved_entries(plan.id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].recipe_id, Some(recipe.id));
    assert_eq!(entries[0].calories, Some(250));
}
