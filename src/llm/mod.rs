// ABOUTME: Text generation abstraction over the hosted model used to brainstorm ideas
// ABOUTME: Defines the single-shot generate contract and re-exports the Vertex AI client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Text Generation
//!
//! The page needs exactly one thing from a language model: turn a prompt into
//! markdown. [`TextGenerator`] captures that contract; [`VertexAiProvider`] is
//! the production implementation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use startup_idea_generator::llm::{TextGenerator, VertexAiProvider};
//! use startup_idea_generator::credentials::{CredentialSource, ScopedCredentials};
//! use idea_core::constants::scopes;
//!
//! # async fn example() -> idea_core::errors::AppResult<()> {
//! let key = Arc::new(CredentialSource::from_env().load()?);
//! let client = reqwest::Client::new();
//! let credentials = ScopedCredentials::new(key, &[scopes::CLOUD_PLATFORM], client.clone());
//! let provider = VertexAiProvider::new("my-project", "us-central1", Arc::new(credentials), client);
//! let markdown = provider.generate("Give me one idea", 0.8, 1024).await?;
//! println!("{markdown}");
//! # Ok(())
//! # }
//! ```

pub mod prompts;
mod vertex;

pub use prompts::{build_startup_ideas_prompt, prompt_for};
pub use vertex::VertexAiProvider;

use async_trait::async_trait;
use idea_core::errors::AppResult;
use serde::{Deserialize, Serialize};

/// Token usage statistics reported by the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,
    /// Number of tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// Single-shot text generation
///
/// Implementations make at most one remote call per [`generate`](Self::generate)
/// and never retry.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Unique provider identifier
    fn name(&self) -> &'static str;

    /// Human-readable provider name, used in user-facing error messages
    fn display_name(&self) -> &'static str;

    /// Model that serves requests
    fn model(&self) -> &str;

    /// Generate text for `prompt`
    ///
    /// # Errors
    ///
    /// Returns an error for transport, authentication, quota, or service
    /// failures, and when the response carries no text.
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> AppResult<String>;
}
