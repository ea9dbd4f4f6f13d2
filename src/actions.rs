// ABOUTME: User actions of the idea page: generate, rate, and clear
// ABOUTME: Each action consumes the session state and returns the next state with user feedback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Actions
//!
//! Every button on the page maps to one method on [`IdeaGenerator`]. A method
//! takes the current [`SessionState`] by value and hands back an
//! [`ActionOutcome`] holding the next state plus the messages to show. No
//! error escapes an action; failures become [`Feedback`] entries and the
//! state is left as the failure semantics require:
//!
//! | failure | remote call | state |
//! |---|---|---|
//! | validation | none | unchanged |
//! | generation | one, failed | previous ideas kept |
//! | rating log | one, failed | rating still recorded locally |

use std::fmt;
use std::sync::Arc;

use idea_core::constants::defaults;
use idea_core::errors::{AppError, ErrorCode};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::llm::{prompt_for, TextGenerator};
use crate::models::{GenerationRequest, GenerationResult};
use crate::ratings::{RatingEvent, RatingSink, StarRating};
use crate::session::SessionState;

/// Shown under every generation failure
pub const GENERATION_REMEDIATION: &str =
    "Fixes: Check project ID, enable Vertex AI API, or quota in console.cloud.google.com/vertex-ai";

/// Message for a blank field
const EMPTY_FIELD_MESSAGE: &str = "Enter a field!";

/// Message for rating before any ideas exist
const NO_IDEAS_MESSAGE: &str = "Generate ideas above before rating them.";

/// Severity of a message shown on the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackLevel {
    /// Action completed
    Success,
    /// Neutral information
    Info,
    /// Non-fatal problem
    Warning,
    /// Action failed
    Error,
}

impl FeedbackLevel {
    /// Lowercase name, used as a CSS class
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// One message shown after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// Severity
    pub level: FeedbackLevel,
    /// Text shown to the user
    pub message: String,
}

impl Feedback {
    /// Success message
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Success,
            message: message.into(),
        }
    }

    /// Informational message
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Info,
            message: message.into(),
        }
    }

    /// Warning message
    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Warning,
            message: message.into(),
        }
    }

    /// Error message
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FeedbackLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)
    }
}

/// Local running average of the session's ratings, if any were recorded
#[must_use]
pub fn average_feedback(state: &SessionState) -> Option<Feedback> {
    state
        .average()
        .map(|average| Feedback::info(format!("Local average: {average:.2}/5")))
}

/// Failures an action can report
#[derive(Debug, Error)]
pub enum ActionError {
    /// Input rejected before any remote call
    #[error("{0}")]
    Validation(String),

    /// The model call failed; previous ideas are kept
    #[error("{service} error: {}", without_service_prefix(service, &source.message))]
    Generation {
        /// Display name of the generation service
        service: &'static str,
        /// Underlying error
        #[source]
        source: AppError,
    },

    /// Appending the rating row failed; the rating is still recorded locally
    #[error("Logging skipped (check Sheet sharing): {}", .0.message)]
    Logging(#[source] AppError),
}

impl ActionError {
    /// Convert a request validation failure into the message shown on the page
    #[must_use]
    pub fn validation(error: &AppError) -> Self {
        match error.code {
            ErrorCode::MissingRequiredField => Self::Validation(EMPTY_FIELD_MESSAGE.to_owned()),
            _ => Self::Validation(error.message.clone()),
        }
    }

    /// Static hint shown alongside the error, if any
    #[must_use]
    pub const fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::Generation { .. } => Some(GENERATION_REMEDIATION),
            Self::Validation(_) | Self::Logging(_) => None,
        }
    }

    /// Messages that report this error on the page
    #[must_use]
    pub fn feedback(&self) -> Vec<Feedback> {
        match self {
            Self::Validation(_) | Self::Logging(_) => vec![Feedback::warning(self.to_string())],
            Self::Generation { .. } => {
                let mut messages = vec![Feedback::error(self.to_string())];
                messages.extend(self.remediation().map(Feedback::info));
                messages
            }
        }
    }
}

/// Service errors already name the service; drop it when the caller names it too
fn without_service_prefix<'a>(service: &str, message: &'a str) -> &'a str {
    message
        .strip_prefix(service)
        .and_then(|rest| rest.strip_prefix(": "))
        .unwrap_or(message)
}

/// Next session state plus everything to report about the action
#[derive(Debug)]
pub struct ActionOutcome {
    /// State to store for the session
    pub state: SessionState,
    /// Messages in display order
    pub feedback: Vec<Feedback>,
    /// Failure reported by the action, if any
    pub error: Option<ActionError>,
}

impl ActionOutcome {
    fn ok(state: SessionState) -> Self {
        Self {
            state,
            feedback: Vec::new(),
            error: None,
        }
    }

    fn failed(state: SessionState, error: ActionError) -> Self {
        Self {
            state,
            feedback: error.feedback(),
            error: Some(error),
        }
    }

    /// Outcome for a request whose input could not be read; the state is unchanged
    #[must_use]
    pub fn rejected(state: SessionState, error: &AppError) -> Self {
        Self::failed(state, ActionError::validation(error))
    }

    fn push(mut self, feedback: Feedback) -> Self {
        self.feedback.push(feedback);
        self
    }

    /// Whether the action completed without any failure
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs page actions against the generation and rating backends
#[derive(Clone)]
pub struct IdeaGenerator {
    generator: Arc<dyn TextGenerator>,
    ratings: Arc<dyn RatingSink>,
    max_output_tokens: u32,
    excerpt_chars: usize,
}

impl IdeaGenerator {
    /// Create an action runner with default token and excerpt limits
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, ratings: Arc<dyn RatingSink>) -> Self {
        Self {
            generator,
            ratings,
            max_output_tokens: defaults::MAX_OUTPUT_TOKENS,
            excerpt_chars: defaults::EXCERPT_CHARS,
        }
    }

    /// Set the output token limit passed to every generation
    #[must_use]
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Set how many idea characters go into a rating row
    #[must_use]
    pub fn with_excerpt_chars(mut self, excerpt_chars: usize) -> Self {
        self.excerpt_chars = excerpt_chars;
        self
    }

    /// Generate ideas for `field` and store them in the session
    ///
    /// On failure the previous ideas stay in place.
    #[instrument(skip(self, state), fields(provider = self.generator.name()))]
    pub async fn generate(
        &self,
        mut state: SessionState,
        field: &str,
        idea_count: u8,
        temperature: f32,
    ) -> ActionOutcome {
        let request = match GenerationRequest::new(field, idea_count, temperature) {
            Ok(request) => request,
            Err(e) => {
                debug!(error = %e, "Generation request rejected");
                return ActionOutcome::failed(state, ActionError::validation(&e));
            }
        };

        match self.run_generation(&request).await {
            Ok(result) => {
                info!(
                    field = %request.field,
                    idea_count = request.idea_count.get(),
                    chars = result.text.len(),
                    "Ideas generated"
                );
                state.set_ideas(result);
                ActionOutcome::ok(state).push(Feedback::success("Ideas generated! 🚀"))
            }
            Err(error) => {
                warn!(error = %error, "Idea generation failed");
                ActionOutcome::failed(state, error)
            }
        }
    }

    async fn run_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, ActionError> {
        let prompt = prompt_for(request);
        let text = self
            .generator
            .generate(
                &prompt,
                request.temperature.get(),
                self.max_output_tokens,
            )
            .await
            .map_err(|source| ActionError::Generation {
                service: self.generator.display_name(),
                source,
            })?;
        Ok(GenerationResult::new(text, request))
    }

    /// Submit a star rating for the ideas on screen
    ///
    /// A value equal to the last rating is ignored. A changed value is sent
    /// to the rating sink and then recorded locally, whether or not the
    /// sink accepted it.
    #[instrument(skip(self, state))]
    pub async fn rate(&self, mut state: SessionState, stars: u8) -> ActionOutcome {
        let stars = match StarRating::new(stars) {
            Ok(stars) => stars,
            Err(e) => return ActionOutcome::failed(state, ActionError::validation(&e)),
        };

        let Some(event) = state
            .ideas
            .as_ref()
            .map(|ideas| RatingEvent::new(stars, ideas, self.excerpt_chars))
        else {
            return ActionOutcome::failed(
                state,
                ActionError::Validation(NO_IDEAS_MESSAGE.to_owned()),
            );
        };

        let mut outcome = if state.rating_changed(stars) {
            let logged = self.ratings.log_rating(&event).await;
            let change = state.record_rating(stars);
            debug!(?change, history = state.ratings_history.len(), "Rating recorded");
            match logged {
                Ok(()) => ActionOutcome::ok(state)
                    .push(Feedback::success(format!("Rating {stars}/5 logged! ⭐"))),
                Err(source) => {
                    warn!(error = %source, "Rating logging failed");
                    ActionOutcome::failed(state, ActionError::Logging(source))
                }
            }
        } else {
            debug!("Rating unchanged, nothing logged");
            ActionOutcome::ok(state)
        };

        if let Some(average) = average_feedback(&outcome.state) {
            outcome = outcome.push(average);
        }
        outcome
    }

    /// Reset the session
    #[must_use]
    pub fn clear(&self, mut state: SessionState) -> ActionOutcome {
        state.clear();
        info!("Session cleared");
        ActionOutcome::ok(state)
    }
}

impl fmt::Debug for IdeaGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdeaGenerator")
            .field("generator", &self.generator.name())
            .field("model", &self.generator.model())
            .field("max_output_tokens", &self.max_output_tokens)
            .field("excerpt_chars", &self.excerpt_chars)
            .finish_non_exhaustive()
    }
}
