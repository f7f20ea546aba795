// ABOUTME: Configuration module organization for the NutriPlan server
// ABOUTME: Groups environment-driven runtime configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan

//! Configuration management for the NutriPlan server

/// Environment-based server configuration
pub mod environment;
