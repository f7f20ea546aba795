// ABOUTME: Main library entry point for the NutriPlan meal planning API
// ABOUTME: Provides recipe suggestion ranking, meal plan generation, and REST routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

#![deny(unsafe_code)]

//! # NutriPlan Server
//!
//! A personal nutrition and meal-planning API. Users browse and create
//! recipes, maintain dietary preferences, and generate multi-day meal
//! plans from recipes ranked against those preferences.
//!
//! ## Architecture
//!
//! The server follows a modular architecture:
//! - **Database**: SQLite-backed stores for recipes, preferences, and
//!   meal plans (live calendar plus durable saved plans)
//! - **Planner**: the suggestion engine that ranks recipe candidates and
//!   the generator that assembles day-by-day plans from them
//! - **Routes**: REST handlers delegating to the stores and the planner
//! - **Config**: environment-driven runtime configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use nutriplan::config::environment::ServerConfig;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("NutriPlan server configured with port: {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// Configuration management
pub mod config;

/// Database pool, schema, and per-domain stores
pub mod database;

/// Unified error handling
pub mod errors;

/// Logging configuration
pub mod logging;

/// Suggestion ranking and meal plan generation
pub mod planner;

/// HTTP route handlers
pub mod routes;

/// HTTP server assembly
pub mod server;
