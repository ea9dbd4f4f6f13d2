// ABOUTME: Server binary for the startup idea generator page
// ABOUTME: Loads configuration and credentials, wires the Google clients, and serves the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Startup Idea Generator Server Binary
//!
//! Starts the single-page idea generator. Configuration comes from the
//! environment; `--host` and `--port` override the bind address.

use std::net::IpAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use idea_core::constants::scopes;
use reqwest::Client;
use startup_idea_generator::{
    actions::IdeaGenerator,
    config::{load_dotenv, AppConfig},
    credentials::ScopedCredentials,
    llm::VertexAiProvider,
    logging,
    ratings::SheetsRatingLogger,
    routes::{self, PageContext},
};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, info, warn};

/// Command-line overrides for the bind address
#[derive(Parser)]
#[command(name = "idea-generator-server")]
#[command(about = "AI Startup Idea Generator - Gemini on Vertex AI with Google Sheets feedback")]
pub struct Args {
    /// Override HTTP bind address
    #[arg(long)]
    host: Option<IpAddr>,

    /// Override HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // .env may set RUST_LOG
    let dotenv = load_dotenv();
    logging::init_from_env()?;
    match dotenv {
        Some(path) => info!("Loaded environment from {}", path.display()),
        None => debug!("No .env file loaded"),
    }

    let mut config = AppConfig::from_env()?;
    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }
    info!("{}", config.summary());

    let key = Arc::new(config.credentials.load()?);
    let client = Client::new();

    let vertex_credentials = ScopedCredentials::new(
        Arc::clone(&key),
        &[scopes::CLOUD_PLATFORM],
        client.clone(),
    );
    let sheets_credentials = ScopedCredentials::new(
        key,
        &[scopes::SPREADSHEETS, scopes::DRIVE],
        client.clone(),
    );

    let generator = VertexAiProvider::new(
        config.generation.project_id.clone(),
        config.generation.region.clone(),
        Arc::new(vertex_credentials),
        client.clone(),
    )
    .with_model(config.generation.model.clone());
    let ratings = SheetsRatingLogger::new(
        config.ratings.spreadsheet_name.clone(),
        Arc::new(sheets_credentials),
        client,
    );

    let actions = IdeaGenerator::new(Arc::new(generator), Arc::new(ratings))
        .with_max_output_tokens(config.generation.max_output_tokens)
        .with_excerpt_chars(config.ratings.excerpt_chars);
    let app = routes::router(Arc::new(PageContext::new(actions)));

    let addr = config.http.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("Serving startup idea generator on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
    }
}
