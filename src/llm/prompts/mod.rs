// ABOUTME: Startup idea prompt template loaded at compile time
// ABOUTME: Substitutes the field and idea count into the fixed markdown schema sent to the model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! The startup idea prompt is kept in a markdown file next to this module so
//! the wording can be edited without touching code. It asks the model for a
//! fixed section layout per idea (pitch, description, market, revenue model,
//! competitors, SWOT, practicality); the layout is a contract with the model
//! and is not checked on the way back.

use crate::models::{GenerationRequest, IdeaCount};

/// Raw template with `{num_ideas}` and `{field}` placeholders
pub const STARTUP_IDEAS_TEMPLATE: &str = include_str!("startup_ideas.md");

const NUM_IDEAS_PLACEHOLDER: &str = "{num_ideas}";
const FIELD_PLACEHOLDER: &str = "{field}";

/// Build the startup idea prompt for `field` and `idea_count`
///
/// `field` is inserted verbatim; callers validate it through
/// [`GenerationRequest::new`].
#[must_use]
pub fn build_startup_ideas_prompt(field: &str, idea_count: IdeaCount) -> String {
    STARTUP_IDEAS_TEMPLATE
        .replace(NUM_IDEAS_PLACEHOLDER, &idea_count.to_string())
        .replace(FIELD_PLACEHOLDER, field)
}

/// Build the prompt for a validated request
#[must_use]
pub fn prompt_for(request: &GenerationRequest) -> String {
    build_startup_ideas_prompt(&request.field, request.idea_count)
}
