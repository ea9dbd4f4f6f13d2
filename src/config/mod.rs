// ABOUTME: Configuration management module for the idea generator server
// ABOUTME: Exposes the environment-driven settings for generation, ratings, and HTTP serving
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration is read once at startup from environment variables (and an
//! optional `.env` file). There is no configuration file format.

/// Environment and server configuration
pub mod environment;

pub use environment::{
    load_dotenv, AppConfig, Environment, GenerationSettings, HttpSettings, LogLevel,
    RatingsSettings,
};
