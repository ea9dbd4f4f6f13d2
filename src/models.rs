// ABOUTME: Request and result types for startup idea generation
// ABOUTME: Validated newtypes keep idea count and creativity inside the page control ranges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;

use chrono::{DateTime, Utc};
use idea_core::constants::limits;
use idea_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Number of ideas requested per generation (1–3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct IdeaCount(u8);

impl IdeaCount {
    /// Validate an idea count
    ///
    /// # Errors
    ///
    /// Returns a validation error outside `1..=3`.
    pub fn new(count: u8) -> AppResult<Self> {
        if (limits::MIN_IDEAS..=limits::MAX_IDEAS).contains(&count) {
            Ok(Self(count))
        } else {
            Err(AppError::out_of_range(format!(
                "Number of ideas must be between {} and {}, got {count}",
                limits::MIN_IDEAS,
                limits::MAX_IDEAS
            )))
        }
    }

    /// Raw count
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for IdeaCount {
    fn default() -> Self {
        Self(limits::DEFAULT_IDEAS)
    }
}

impl TryFrom<u8> for IdeaCount {
    type Error = AppError;

    fn try_from(value: u8) -> AppResult<Self> {
        Self::new(value)
    }
}

impl From<IdeaCount> for u8 {
    fn from(value: IdeaCount) -> Self {
        value.0
    }
}

impl fmt::Display for IdeaCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sampling temperature ("creativity"), 0.5–1.2 in steps of 0.1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Temperature(f32);

impl Temperature {
    /// Validate a temperature and snap it to the slider step
    ///
    /// # Errors
    ///
    /// Returns a validation error for non-finite values or values outside
    /// `0.5..=1.2`.
    pub fn new(value: f32) -> AppResult<Self> {
        if !value.is_finite() {
            return Err(AppError::invalid_input("Creativity must be a number"));
        }
        let snapped = (value / limits::TEMPERATURE_STEP).round() * limits::TEMPERATURE_STEP;
        // Compare on the snapped value so 1.2000001 from a form is accepted
        if snapped < limits::MIN_TEMPERATURE - f32::EPSILON
            || snapped > limits::MAX_TEMPERATURE + f32::EPSILON
        {
            return Err(AppError::out_of_range(format!(
                "Creativity must be between {} and {}, got {value}",
                limits::MIN_TEMPERATURE,
                limits::MAX_TEMPERATURE
            )));
        }
        Ok(Self(snapped))
    }

    /// Raw temperature
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self(limits::DEFAULT_TEMPERATURE)
    }
}

impl TryFrom<f32> for Temperature {
    type Error = AppError;

    fn try_from(value: f32) -> AppResult<Self> {
        Self::new(value)
    }
}

impl From<Temperature> for f32 {
    fn from(value: Temperature) -> Self {
        value.0
    }
}

/// Parameters of one "Generate Ideas" press
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Industry or field, trimmed and non-empty
    pub field: String,
    /// Number of ideas to request
    pub idea_count: IdeaCount,
    /// Sampling temperature
    pub temperature: Temperature,
}

impl GenerationRequest {
    /// Validate raw page input
    ///
    /// # Errors
    ///
    /// Returns a missing-field error when `field` is empty or whitespace, and
    /// a range error for idea count or temperature outside their limits.
    pub fn new(field: &str, idea_count: u8, temperature: f32) -> AppResult<Self> {
        let field = field.trim();
        if field.is_empty() {
            return Err(AppError::missing_field("Industry/field"));
        }
        Ok(Self {
            field: field.to_owned(),
            idea_count: IdeaCount::new(idea_count)?,
            temperature: Temperature::new(temperature)?,
        })
    }
}

/// Markdown returned by a successful generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Model output, rendered as markdown
    pub text: String,
    /// Field the ideas were generated for
    pub field: String,
    /// Idea count that was requested
    pub idea_count: IdeaCount,
    /// When the result was stored
    pub generated_at: DateTime<Utc>,
}

impl GenerationResult {
    /// Wrap model output for the request that produced it
    #[must_use]
    pub fn new(text: String, request: &GenerationRequest) -> Self {
        Self {
            text,
            field: request.field.clone(),
            idea_count: request.idea_count,
            generated_at: Utc::now(),
        }
    }
}
