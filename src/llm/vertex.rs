// ABOUTME: Google Vertex AI client for Gemini text generation
// ABOUTME: Authenticates with scoped service account credentials and calls generateContent once per request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Vertex AI Provider
//!
//! Implementation of [`TextGenerator`] for Google's Vertex AI platform.
//!
//! ## Configuration
//!
//! - `GCP_PROJECT_ID`: GCP project hosting the model
//! - `GCP_REGION`: Region for Vertex AI (default: `us-central1`)
//! - `VERTEX_MODEL`: Model name (default: `gemini-2.5-pro`)
//!
//! Authentication uses a bearer token from the `cloud-platform` scoped
//! service account credentials.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use async_trait::async_trait;
use idea_core::constants::{defaults, service_names};
use idea_core::errors::{AppError, AppResult};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{TextGenerator, TokenUsage};
use crate::credentials::AccessTokenProvider;

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Vertex AI `generateContent` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VertexRequest {
    contents: Vec<VertexContent>,
    generation_config: GenerationConfig,
}

/// Content structure for Vertex AI API
#[derive(Debug, Serialize, Deserialize)]
struct VertexContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

/// Part of content; only text parts are produced or consumed here
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContentPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// Generation configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    candidate_count: u32,
}

/// Vertex AI API response structure
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VertexResponse {
    candidates: Option<Vec<Candidate>>,
    usage_metadata: Option<UsageMetadata>,
    error: Option<VertexError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<VertexContent>,
    finish_reason: Option<String>,
}

/// Usage metadata from Vertex AI response
#[derive(Debug, Deserialize)]
struct UsageMetadata {
    #[serde(rename = "promptTokenCount")]
    prompt: Option<u32>,
    #[serde(rename = "candidatesTokenCount")]
    candidates: Option<u32>,
    #[serde(rename = "totalTokenCount")]
    total: Option<u32>,
}

/// API error response
#[derive(Debug, Deserialize)]
struct VertexError {
    message: String,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Vertex AI text generation client
pub struct VertexAiProvider {
    project_id: String,
    region: String,
    model: String,
    api_base: String,
    client: Client,
    credentials: Arc<dyn AccessTokenProvider>,
}

impl VertexAiProvider {
    /// Create a new Vertex AI provider for `project_id` in `region`
    ///
    /// The client carries no request timeout of its own; long generations
    /// are bounded only by the service.
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        region: impl Into<String>,
        credentials: Arc<dyn AccessTokenProvider>,
        client: Client,
    ) -> Self {
        let region = region.into();
        Self {
            project_id: project_id.into(),
            api_base: format!("https://{region}-aiplatform.googleapis.com"),
            region,
            model: defaults::VERTEX_MODEL.to_owned(),
            client,
            credentials,
        }
    }

    /// Set the model name
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different API root (for stand-in servers)
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_owned();
        self
    }

    /// Build the Vertex AI API URL for the configured model and `method`
    fn build_url(&self, method: &str) -> String {
        format!(
            "{base}/v1/projects/{project}/locations/{region}/publishers/google/models/{model}:{method}",
            base = self.api_base,
            project = self.project_id,
            region = self.region,
            model = self.model,
        )
    }

    /// Build a single-turn request for `prompt`
    fn build_request(prompt: &str, temperature: f32, max_output_tokens: u32) -> VertexRequest {
        VertexRequest {
            contents: vec![VertexContent {
                role: Some("user".to_owned()),
                parts: vec![ContentPart {
                    text: Some(prompt.to_owned()),
                }],
            }],
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens,
                candidate_count: 1,
            },
        }
    }

    /// Concatenate the text parts of the first candidate
    fn extract_text(response: &VertexResponse) -> AppResult<String> {
        let candidate = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or_else(|| {
                AppError::external_service(
                    service_names::VERTEX_AI,
                    "No candidates in Vertex AI response",
                )
            })?;

        let text: String = candidate
            .content
            .as_ref()
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            return Err(AppError::external_service(
                service_names::VERTEX_AI,
                format!("Vertex AI returned no text (finish reason: {reason})"),
            ));
        }

        Ok(text)
    }

    /// Convert usage metadata
    fn convert_usage(metadata: &UsageMetadata) -> TokenUsage {
        TokenUsage {
            prompt_tokens: metadata.prompt.unwrap_or(0),
            completion_tokens: metadata.candidates.unwrap_or(0),
            total_tokens: metadata.total.unwrap_or(0),
        }
    }

    /// Map a non-success HTTP status to an error, keeping the raw service message
    fn map_api_error(status: StatusCode, response_text: &str) -> AppError {
        let message = serde_json::from_str::<VertexResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_owned(), |e| e.message);
        let detail = format!("API error ({status}): {message}");

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                AppError::external_auth(service_names::VERTEX_AI, detail)
            }
            StatusCode::TOO_MANY_REQUESTS => {
                AppError::external_rate_limited(service_names::VERTEX_AI, detail)
            }
            _ => AppError::external_service(service_names::VERTEX_AI, detail),
        }
    }
}

#[async_trait]
impl TextGenerator for VertexAiProvider {
    fn name(&self) -> &'static str {
        "vertex"
    }

    fn display_name(&self) -> &'static str {
        service_names::VERTEX_AI
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(
        &self,
        prompt: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> AppResult<String> {
        let url = self.build_url("generateContent");
        let vertex_request = Self::build_request(prompt, temperature, max_output_tokens);

        let token = self.credentials.access_token().await?;

        debug!("Sending request to Vertex AI");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&vertex_request)
            .send()
            .await
            .map_err(|e| {
                AppError::external_unavailable(
                    service_names::VERTEX_AI,
                    format!("HTTP request failed: {e}"),
                )
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            AppError::external_unavailable(
                service_names::VERTEX_AI,
                format!("Failed to read response: {e}"),
            )
        })?;

        if !status.is_success() {
            error!(status = %status, "Vertex AI API error");
            return Err(Self::map_api_error(status, &response_text));
        }

        let vertex_response: VertexResponse =
            serde_json::from_str(&response_text).map_err(|e| {
                error!(error = %e, "Failed to parse Vertex AI response");
                AppError::external_service(
                    service_names::VERTEX_AI,
                    format!("Failed to parse response: {e}"),
                )
            })?;

        if let Some(error) = vertex_response.error {
            return Err(AppError::external_service(
                service_names::VERTEX_AI,
                format!("API error: {}", error.message),
            ));
        }

        let text = Self::extract_text(&vertex_response)?;
        let usage = vertex_response
            .usage_metadata
            .as_ref()
            .map(Self::convert_usage)
            .unwrap_or_default();
        let finish_reason = vertex_response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.finish_reason.as_deref())
            .unwrap_or("unknown");

        debug!(
            total_tokens = usage.total_tokens,
            completion_tokens = usage.completion_tokens,
            finish_reason,
            "Received Vertex AI response"
        );

        Ok(text)
    }
}

impl Debug for VertexAiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VertexAiProvider")
            .field("project_id", &self.project_id)
            .field("region", &self.region)
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}
