// ABOUTME: Normalization of legacy preference encodings into canonical forms
// ABOUTME: Restrictions (array or boolean map), goals (string or array), tag derivation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! Preference normalization
//!
//! User preferences have accumulated two encodings for dietary
//! restrictions (`["Vegan"]` and `{"vegan": true}`) and two for goals
//! (a plain string and an array of strings). All tolerance for those
//! shapes is isolated here; the rest of the planner only ever sees
//! canonical lowercased string sets. Unparseable substructures
//! normalize to empty, never to an error.

use serde_json::Value;

/// Nutrient ordering selected by a user's goals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalOrdering {
    /// Lowest-calorie recipes first (weight loss)
    CalorieAscending,
    /// Highest-protein recipes first (muscle/strength gain)
    ProteinDescending,
}

/// Derive the recipe tag matching a restriction name: lowercase, with
/// whitespace runs replaced by hyphens (`"Gluten Free"` -> `"gluten-free"`)
#[must_use]
pub fn restriction_tag(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Extract the active restriction names from either legacy encoding
///
/// Arrays contribute their string elements; maps contribute the keys
/// whose value is `true`. Anything else yields no restrictions.
#[must_use]
pub fn active_restrictions(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .filter(|(_, enabled)| enabled.as_bool() == Some(true))
            .map(|(name, _)| name.clone())
            .collect(),
        _ => Vec::new(),
    }
}

/// Normalize the goals field into lowercased strings
///
/// Accepts a JSON array of strings or a plain string; a blank value
/// yields no goals.
#[must_use]
pub fn normalized_goals(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(raw) {
        return items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_lowercase))
            .collect();
    }

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![trimmed.to_lowercase()]
    }
}

/// Select the nutrient ordering implied by a set of normalized goals
///
/// Matching is substring containment, deliberately tolerant of phrasing
/// variants. Weight loss takes priority over muscle gain when both match.
#[must_use]
pub fn goal_ordering(goals: &[String]) -> Option<GoalOrdering> {
    let wants_weight_loss = goals
        .iter()
        .any(|g| g.contains("weight loss") || g.contains("lose weight"));
    if wants_weight_loss {
        return Some(GoalOrdering::CalorieAscending);
    }

    let wants_muscle = goals
        .iter()
        .any(|g| g.contains("muscle") || g.contains("strength") || g.contains("gain"));
    if wants_muscle {
        return Some(GoalOrdering::ProteinDescending);
    }

    None
}
