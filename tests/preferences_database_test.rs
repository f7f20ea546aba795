// ABOUTME: Unit tests for the user preferences database module
// ABOUTME: Tests upsert semantics and round-tripping of both legacy encodings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

#![allow(missing_docs, clippy::unwrap_used)]

use nutriplan::database::preferences::UpsertPreferencesRequest;
use nutriplan::database::Database;
use serde_json::json;
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

#[tokio::test]
async fn test_get_absent_preferences_is_none() {
    let db = create_test_db().await;
    assert!(db.preferences().get("user-1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_upsert_creates_then_updates_single_row() {
    let db = create_test_db().await;
    let preferences = db.preferences();

    let request = UpsertPreferencesRequest {
        dietary_restrictions: Some(json!(["Vegan"])),
        goals: Some(json!("weight_loss")),
        activity_level: Some("active".to_owned()),
        meal_frequency: Some(3),
        snacks_per_day: Some(1),
    };
    let first = preferences.upsert("user-1", &request).await.unwrap();
    assert_eq!(first.snacks_per_day, 1);

    let request = UpsertPreferencesRequest {
        dietary_restrictions: Some(json!(["Vegan", "Gluten-Free"])),
        goals: Some(json!("weight_loss")),
        activity_level: Some("active".to_owned()),
        meal_frequency: Some(4),
        snacks_per_day: Some(2),
    };
    let second = preferences.upsert("user-1", &request).await.unwrap();

    // Same row, updated in place
    assert_eq!(second.id, first.id);
    assert_eq!(second.snacks_per_day, 2);
    assert_eq!(second.meal_frequency, 4);
}

#[tokio::test]
async fn test_restrictions_array_round_trip() {
    let db = create_test_db().await;
    let preferences = db.preferences();

    let request = UpsertPreferencesRequest {
        dietary_restrictions: Some(json!(["Vegan", "Low Carb"])),
        ..Default::default()
    };
    preferences.upsert("user-1", &request).await.unwrap();

    let stored = preferences.get("user-1").await.unwrap().unwrap();
    assert_eq!(stored.dietary_restrictions, Some(json!(["Vegan", "Low Carb"])));
}

#[tokio::test]
async fn test_restrictions_map_round_trip() {
    let db = create_test_db().await;
    let preferences = db.preferences();

    let request = UpsertPreferencesRequest {
        dietary_restrictions: Some(json!({"vegan": true, "keto": false})),
        ..Default::default()
    };
    preferences.upsert("user-1", &request).await.unwrap();

    let stored = preferences.get("user-1").await.unwrap().unwrap();
    assert_eq!(
        stored.dietary_restrictions,
        Some(json!({"vegan": true, "keto": false}))
    );
}

#[tokio::test]
async fn test_goals_string_and_array_encodings() {
    let db = create_test_db().await;
    let preferences = db.preferences();

    // Plain string stays plain
    let request = UpsertPreferencesRequest {
        goals: Some(json!("muscle_gain")),
        ..Default::default()
    };
    preferences.upsert("user-1", &request).await.unwrap();
    let stored = preferences.get("user-1").await.unwrap().unwrap();
    assert_eq!(stored.goals.as_deref(), Some("muscle_gain"));

    // Arrays are stored as JSON text
    let request = UpsertPreferencesRequest {
        goals: Some(json!(["Muscle Building", "Strength"])),
        ..Default::default()
    };
    preferences.upsert("user-2", &request).await.unwrap();
    let stored = preferences.get("user-2").await.unwrap().unwrap();
    assert_eq!(
        stored.goals.as_deref(),
        Some(r#"["Muscle Building","Strength"]"#)
    );
}

#[tokio::test]
async fn test_defaults_applied_when_fields_absent() {
    let db = create_test_db().await;

    let stored = db
        .preferences()
        .upsert("user-1", &UpsertPreferencesRequest::default())
        .await
        .unwrap();

    assert_eq!(stored.meal_frequency, 3);
    assert_eq!(stored.snacks_per_day, 1);
    assert!(stored.dietary_restrictions.is_none());
    assert!(stored.goals.is_none());
}
