// ABOUTME: Per-session page state holding the latest ideas and the rating history
// ABOUTME: Plain serializable value passed into and returned from every user action
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::models::GenerationResult;
use crate::ratings::StarRating;

/// Outcome of [`SessionState::record_rating`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingChange {
    /// New value stored and appended to the history
    Changed,
    /// Same as the last rating; nothing stored
    Unchanged,
}

/// State of one browser session
///
/// Created empty, filled by generate and rate, and reset by clear. A new
/// generation replaces `ideas` but keeps the rating history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Most recent successful generation
    pub ideas: Option<GenerationResult>,
    /// Last rating that was recorded
    pub last_rating: Option<StarRating>,
    /// Every recorded rating change, oldest first
    pub ratings_history: Vec<StarRating>,
}

impl SessionState {
    /// Replace the stored ideas
    pub fn set_ideas(&mut self, result: GenerationResult) {
        self.ideas = Some(result);
    }

    /// Whether ideas are available to rate
    #[must_use]
    pub const fn has_ideas(&self) -> bool {
        self.ideas.is_some()
    }

    /// Whether recording `stars` would change the state
    #[must_use]
    pub fn rating_changed(&self, stars: StarRating) -> bool {
        self.last_rating != Some(stars)
    }

    /// Record `stars` unless it equals the last rating
    pub fn record_rating(&mut self, stars: StarRating) -> RatingChange {
        if !self.rating_changed(stars) {
            return RatingChange::Unchanged;
        }
        self.last_rating = Some(stars);
        self.ratings_history.push(stars);
        RatingChange::Changed
    }

    /// Mean of the rating history, `None` before the first rating
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        if self.ratings_history.is_empty() {
            return None;
        }
        let total: u32 = self
            .ratings_history
            .iter()
            .map(|stars| u32::from(stars.get()))
            .sum();
        Some(f64::from(total) / self.ratings_history.len() as f64)
    }

    /// Drop ideas, last rating, and history
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
