// ABOUTME: Main library entry point for the AI startup idea generator
// ABOUTME: Prompt building, Vertex AI generation, Google Sheets rating logs, and the page server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Startup Idea Generator
//!
//! A single page that turns an industry or field into a handful of realistic
//! startup ideas. The ideas come from Gemini on Vertex AI; star ratings for
//! them are appended to a Google Sheet for later analysis.
//!
//! ## Flow
//!
//! 1. The user enters a field, an idea count (1–3), and a creativity value.
//! 2. [`llm::prompts`] fills the fixed markdown template.
//! 3. [`llm::VertexAiProvider`] makes one `generateContent` call.
//! 4. The markdown is stored in the caller's [`session::SessionState`] and rendered.
//! 5. A changed star rating is appended to the sheet by
//!    [`ratings::SheetsRatingLogger`] and added to the local average.
//!
//! [`actions::IdeaGenerator`] drives steps 2–5; [`routes`] exposes them over HTTP.

/// User actions: generate, rate, clear
pub mod actions;
/// Environment configuration
pub mod config;
/// Service account key loading and OAuth access tokens
pub mod credentials;
/// Structured logging setup
pub mod logging;
/// Text generation contract, prompts, and the Vertex AI client
pub mod llm;
/// Generation request and result types
pub mod models;
/// Star ratings and the spreadsheet logger
pub mod ratings;
/// HTTP routes and page rendering
pub mod routes;
/// Per-session page state
pub mod session;

pub use idea_core::errors::{AppError, AppResult, ErrorCode};
