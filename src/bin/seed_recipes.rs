// ABOUTME: Recipe seeding utility for the NutriPlan server
// ABOUTME: Creates the default system-owned public sample recipes in the database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! Sample recipe seeder for the NutriPlan server.
//!
//! This binary inserts the default public recipes owned by the `system`
//! user so new installations have suggestion and generation content.
//!
//! Usage:
//! ```bash
//! # Seed sample recipes (uses DATABASE_URL from environment)
//! cargo run --bin seed-recipes
//!
//! # Override database URL
//! cargo run --bin seed-recipes -- --database-url sqlite:./data/nutriplan.db
//!
//! # Force re-seed even if system recipes already exist
//! cargo run --bin seed-recipes -- --force
//! ```

use anyhow::Result;
use clap::Parser;
use nutriplan::database::recipes::{CreateRecipeRequest, SYSTEM_OWNER};
use nutriplan::database::Database;
use std::env;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "seed-recipes",
    about = "NutriPlan sample recipe seeder",
    long_about = "Insert the default system-owned public recipes used for suggestions and plan generation"
)]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Force re-seed even if system recipes already exist
    #[arg(long)]
    force: bool,
}

/// Sample recipe definition
struct SampleRecipe {
    title: &'static str,
    ingredients: &'static [&'static str],
    instructions: &'static str,
    prep_time: i64,
    cook_time: i64,
    servings: i64,
    calories: i64,
    protein: i64,
    carbs: i64,
    fat: i64,
    tags: &'static [&'static str],
    image_url: &'static str,
}

/// The default sample recipes, tagged for different dietary preferences
const SAMPLE_RECIPES: &[SampleRecipe] = &[
    SampleRecipe {
        title: "High-Protein Chicken Breast",
        ingredients: &[
            "chicken breast",
            "broccoli",
            "olive oil",
            "garlic",
            "salt",
            "pepper",
        ],
        instructions: "1. Preheat oven to 375\u{b0}F. 2. Season chicken breast. 3. Bake for 25 minutes. 4. Serve with steamed broccoli.",
        prep_time: 10,
        cook_time: 25,
        servings: 1,
        calories: 350,
        protein: 40,
        carbs: 10,
        fat: 15,
        tags: &["high-protein", "muscle-gain", "gluten-free", "dairy-free"],
        image_url: "https://images.unsplash.com/photo-1604503468506-a8da13d82791?q=80&w=2574&auto=format&fit=crop",
    },
    SampleRecipe {
        title: "Protein-Packed Quinoa Bowl",
        ingredients: &[
            "quinoa",
            "chicken",
            "bell peppers",
            "kale",
            "olive oil",
            "lemon juice",
        ],
        instructions: "1. Cook quinoa according to package. 2. Grill chicken. 3. Saut\u{e9} vegetables. 4. Combine and drizzle with olive oil and lemon.",
        prep_time: 15,
        cook_time: 20,
        servings: 2,
        calories: 450,
        protein: 35,
        carbs: 45,
        fat: 15,
        tags: &["high-protein", "gluten-free", "muscle-gain", "balanced"],
        image_url: "https://images.unsplash.com/photo-1546793665-c74683f339c1?q=80&w=2574&auto=format&fit=crop",
    },
    SampleRecipe {
        title: "Muscle-Building Salmon Plate",
        ingredients: &[
            "salmon fillet",
            "sweet potato",
            "spinach",
            "olive oil",
            "lemon",
            "garlic",
        ],
        instructions: "1. Bake salmon at 400\u{b0}F for 15 minutes. 2. Roast sweet potatoes. 3. Saut\u{e9} spinach with garlic. 4. Serve together.",
        prep_time: 10,
        cook_time: 25,
        servings: 1,
        calories: 500,
        protein: 30,
        carbs: 40,
        fat: 25,
        tags: &["high-protein", "omega-3", "gluten-free", "muscle-gain"],
        image_url: "https://images.unsplash.com/photo-1519708227418-c8fd9a32b7a2?q=80&w=2570&auto=format&fit=crop",
    },
    SampleRecipe {
        title: "Vegan Protein Stir-Fry",
        ingredients: &[
            "tofu",
            "broccoli",
            "bell peppers",
            "carrots",
            "brown rice",
            "soy sauce",
            "garlic",
        ],
        instructions: "1. Press and cube tofu. 2. Stir-fry vegetables and tofu. 3. Add sauce and simmer. 4. Serve over brown rice.",
        prep_time: 20,
        cook_time: 15,
        servings: 2,
        calories: 380,
        protein: 20,
        carbs: 45,
        fat: 12,
        tags: &["vegan", "plant-based", "gluten-free", "dairy-free"],
        image_url: "https://images.unsplash.com/photo-1512621776951-a57141f2eefd?q=80&w=2570&auto=format&fit=crop",
    },
    SampleRecipe {
        title: "High-Protein Breakfast Bowl",
        ingredients: &["Greek yogurt", "almonds", "chia seeds", "berries", "honey"],
        instructions: "1. Add yogurt to a bowl. 2. Top with nuts, seeds, and berries. 3. Drizzle with honey.",
        prep_time: 5,
        cook_time: 0,
        servings: 1,
        calories: 320,
        protein: 25,
        carbs: 30,
        fat: 15,
        tags: &["breakfast", "high-protein", "vegetarian", "quick"],
        image_url: "https://images.unsplash.com/photo-1511690656952-34342bb7c2f2?q=80&w=2564&auto=format&fit=crop",
    },
    SampleRecipe {
        title: "Protein Pancakes",
        ingredients: &[
            "oats",
            "protein powder",
            "egg whites",
            "banana",
            "cinnamon",
            "baking powder",
        ],
        instructions: "1. Blend all ingredients. 2. Cook on a non-stick pan. 3. Serve with fresh fruit.",
        prep_time: 5,
        cook_time: 10,
        servings: 1,
        calories: 350,
        protein: 30,
        carbs: 35,
        fat: 8,
        tags: &["breakfast", "high-protein", "muscle-gain"],
        image_url: "https://images.unsplash.com/photo-1506084868230-bb9d95c24759?q=80&w=2574&auto=format&fit=crop",
    },
    SampleRecipe {
        title: "Turkey and Avocado Wrap",
        ingredients: &[
            "turkey slices",
            "avocado",
            "lettuce",
            "tomato",
            "whole grain wrap",
            "mustard",
        ],
        instructions: "1. Lay out wrap. 2. Layer ingredients. 3. Roll up tightly. 4. Cut in half to serve.",
        prep_time: 5,
        cook_time: 0,
        servings: 1,
        calories: 400,
        protein: 30,
        carbs: 30,
        fat: 20,
        tags: &["lunch", "high-protein", "quick"],
        image_url: "https://images.unsplash.com/photo-1603046891746-c8925bd71e96?q=80&w=2574&auto=format&fit=crop",
    },
    SampleRecipe {
        title: "Power Protein Smoothie",
        ingredients: &[
            "protein powder",
            "banana",
            "spinach",
            "almond milk",
            "peanut butter",
            "ice",
        ],
        instructions: "1. Add all ingredients to blender. 2. Blend until smooth. 3. Serve immediately.",
        prep_time: 5,
        cook_time: 0,
        servings: 1,
        calories: 300,
        protein: 25,
        carbs: 30,
        fat: 10,
        tags: &["smoothie", "high-protein", "post-workout", "quick", "gluten-free"],
        image_url: "https://images.unsplash.com/photo-1553530979-fbb9e4aee36f?q=80&w=2574&auto=format&fit=crop",
    },
];

#[tokio::main]
async fn main() -> Result<()> {
    nutriplan::logging::init_from_env()?;

    let args = SeedArgs::parse();
    let database_url = args
        .database_url
        .or_else(|| env::var("DATABASE_URL").ok())
        .unwrap_or_else(|| "sqlite:./data/nutriplan.db".to_owned());

    let database = Database::new(&database_url).await?;
    let recipes = database.recipes();

    let existing = recipes.count_for_user(SYSTEM_OWNER).await?;
    if existing > 0 && !args.force {
        info!("Database already has {existing} system recipes. Skipping seed.");
        return Ok(());
    }

    info!("Seeding database with {} sample recipes", SAMPLE_RECIPES.len());

    for sample in SAMPLE_RECIPES {
        let request = CreateRecipeRequest {
            title: sample.title.to_owned(),
            ingredients: sample.ingredients.iter().map(|&s| s.to_owned()).collect(),
            instructions: sample.instructions.to_owned(),
            prep_time: Some(sample.prep_time),
            cook_time: Some(sample.cook_time),
            servings: Some(sample.servings),
            calories: Some(sample.calories),
            protein: Some(sample.protein),
            carbs: Some(sample.carbs),
            fat: Some(sample.fat),
            image_url: Some(sample.image_url.to_owned()),
            tags: sample.tags.iter().map(|&s| s.to_owned()).collect(),
            is_public: true,
        };

        let recipe = recipes.create(SYSTEM_OWNER, &request).await?;
        info!("Seeded recipe {}: {}", recipe.id, recipe.title);
    }

    info!("Successfully seeded {} recipes", SAMPLE_RECIPES.len());
    Ok(())
}
