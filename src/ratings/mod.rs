// ABOUTME: Star ratings submitted for generated ideas and the sink that records them
// ABOUTME: Builds the five-column rating row and defines the remote logging contract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Ratings
//!
//! A [`RatingEvent`] is created when the user submits a new star value for the
//! ideas on screen. It becomes one spreadsheet row:
//!
//! | timestamp | stars | field | idea count | excerpt |
//! |---|---|---|---|---|
//! | `2026-01-15 14:03:59` | `4` | `fintech` | `2` | `# Idea 1: ...` |
//!
//! Rows are append-only; nothing here edits or deletes them.

mod sheets;

pub use sheets::SheetsRatingLogger;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use idea_core::constants::limits;
use idea_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{GenerationResult, IdeaCount};

/// Timestamp layout of the first spreadsheet column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Appended to every excerpt
const ELLIPSIS: &str = "...";

/// A 1–5 star rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    /// Validate a star value
    ///
    /// # Errors
    ///
    /// Returns a validation error outside `1..=5`.
    pub fn new(stars: u8) -> AppResult<Self> {
        if (limits::MIN_STARS..=limits::MAX_STARS).contains(&stars) {
            Ok(Self(stars))
        } else {
            Err(AppError::out_of_range(format!(
                "Rating must be between {} and {} stars, got {stars}",
                limits::MIN_STARS,
                limits::MAX_STARS
            )))
        }
    }

    /// Raw star count
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for StarRating {
    type Error = AppError;

    fn try_from(value: u8) -> AppResult<Self> {
        Self::new(value)
    }
}

impl From<StarRating> for u8 {
    fn from(value: StarRating) -> Self {
        value.0
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One rating submission, as written to the spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingEvent {
    /// Local wall-clock time of the submission
    pub timestamp: DateTime<Local>,
    /// Submitted rating
    pub stars: StarRating,
    /// Field the rated ideas were generated for
    pub field: String,
    /// Idea count of the rated generation
    pub idea_count: IdeaCount,
    /// Leading characters of the rated ideas plus an ellipsis
    pub idea_excerpt: String,
}

impl RatingEvent {
    /// Build an event for `stars` on `ideas`, timestamped now
    #[must_use]
    pub fn new(stars: StarRating, ideas: &GenerationResult, excerpt_chars: usize) -> Self {
        Self::at(Local::now(), stars, ideas, excerpt_chars)
    }

    /// Build an event with an explicit timestamp
    #[must_use]
    pub fn at(
        timestamp: DateTime<Local>,
        stars: StarRating,
        ideas: &GenerationResult,
        excerpt_chars: usize,
    ) -> Self {
        Self {
            timestamp,
            stars,
            field: ideas.field.clone(),
            idea_count: ideas.idea_count,
            idea_excerpt: excerpt(&ideas.text, excerpt_chars),
        }
    }

    /// Timestamp as `YYYY-MM-DD HH:MM:SS`
    #[must_use]
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// The five ordered spreadsheet cells
    #[must_use]
    pub fn to_row(&self) -> Vec<Value> {
        vec![
            Value::from(self.formatted_timestamp()),
            Value::from(self.stars.get()),
            Value::from(self.field.clone()),
            Value::from(self.idea_count.get()),
            Value::from(self.idea_excerpt.clone()),
        ]
    }
}

/// First `max_chars` characters of `text` followed by `...`
///
/// Counts characters, not bytes, so multi-byte text is never split.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let cut = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(index, _)| index);
    format!("{}{ELLIPSIS}", &text[..cut])
}

/// Destination for rating rows
#[async_trait]
pub trait RatingSink: Send + Sync {
    /// Append one row for `event`
    ///
    /// # Errors
    ///
    /// Returns an error when authentication, lookup, or the append fails.
    async fn log_rating(&self, event: &RatingEvent) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenerationRequest;
    use chrono::TimeZone;

    fn ideas(text: &str) -> GenerationResult {
        let request = GenerationRequest::new("fintech", 2, 0.8).unwrap();
        GenerationResult::new(text.to_owned(), &request)
    }

    #[test]
    fn test_star_rating_bounds() {
        assert!(StarRating::new(0).is_err());
        assert!(StarRating::new(1).is_ok());
        assert!(StarRating::new(5).is_ok());
        assert!(StarRating::new(6).is_err());
    }

    #[test]
    fn test_excerpt_truncates_by_chars() {
        assert_eq!(excerpt("abcdef", 3), "abc...");
        assert_eq!(excerpt("héllo wörld", 7), "héllo w...");
        assert_eq!(excerpt("🚀🚀🚀", 2), "🚀🚀...");
    }

    #[test]
    fn test_excerpt_short_text_keeps_everything() {
        assert_eq!(excerpt("short", 100), "short...");
        assert_eq!(excerpt("", 100), "...");
    }

    #[test]
    fn test_row_layout() {
        let timestamp = Local.with_ymd_and_hms(2026, 1, 15, 14, 3, 9).unwrap();
        let event = RatingEvent::at(
            timestamp,
            StarRating::new(4).unwrap(),
            &ideas("# Idea 1: Ledger\n\nMore text"),
            8,
        );

        assert_eq!(event.formatted_timestamp(), "2026-01-15 14:03:09");
        assert_eq!(
            event.to_row(),
            vec![
                Value::from("2026-01-15 14:03:09"),
                Value::from(4),
                Value::from("fintech"),
                Value::from(2),
                Value::from("# Idea 1..."),
            ]
        );
    }
}
