// ABOUTME: Server binary for the NutriPlan meal planning API
// ABOUTME: Loads configuration, initializes the database, and serves HTTP
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! # NutriPlan API Server Binary
//!
//! Starts the NutriPlan REST API with database management and
//! structured logging.

use anyhow::Result;
use clap::Parser;
use nutriplan::{
    config::environment::ServerConfig,
    database::Database,
    logging,
    server::{HttpServer, ServerResources},
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "nutriplan-server")]
#[command(about = "NutriPlan - personal nutrition and meal planning API")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration from environment
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(database_url) = args.database_url {
        config.database_url = database_url;
    }

    // Initialize production logging
    logging::init_from_env()?;

    info!("Starting NutriPlan API server");
    info!("{}", config.summary());

    // Initialize database and run migrations
    let database = Database::new(&config.database_url).await?;
    info!("Database initialized successfully");

    let resources = Arc::new(ServerResources::new(database, config));
    let server = HttpServer::new(resources);

    server.run().await
}
