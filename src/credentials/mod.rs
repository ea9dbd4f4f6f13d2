// ABOUTME: Service account credential loading from inline JSON secrets or key files
// ABOUTME: Resolves the credential source once and builds scoped token providers from it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Credentials
//!
//! The deployment hands the service account key to the process either as a
//! JSON string (secret manager) or as a path to a key file. [`CredentialSource`]
//! captures which of the two was provided, and [`CredentialSource::load`] is the
//! single place that turns it into a [`ServiceAccountKey`].
//!
//! One key backs two scoped credentials: `cloud-platform` for Vertex AI and
//! `spreadsheets` + `drive` for the rating sheet. See [`ScopedCredentials`].

mod token;

pub use token::{AccessTokenProvider, ScopedCredentials};

use std::env;
use std::fmt::{self, Debug, Formatter};
use std::fs;
use std::path::PathBuf;

use idea_core::constants::{defaults, env_vars};
use idea_core::errors::{AppError, AppResult};
use serde::Deserialize;
use tracing::{debug, info};

/// Where the service account key comes from
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Path to a JSON key file on disk
    FilePath(PathBuf),
    /// The JSON key itself, as provided by a secret manager
    InlineJson(String),
}

impl CredentialSource {
    /// Classify a raw secret value as inline JSON or a file path
    ///
    /// A value whose first non-whitespace character is `{` is treated as the
    /// key document itself; anything else is a path.
    #[must_use]
    pub fn detect(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with('{') {
            Self::InlineJson(trimmed.to_owned())
        } else {
            Self::FilePath(PathBuf::from(trimmed))
        }
    }

    /// Resolve the credential source from the process environment
    ///
    /// Order: `IDEA_GEN_CREDENTIALS` (JSON or path), then
    /// `GOOGLE_APPLICATION_CREDENTIALS` (path), then the default key path.
    #[must_use]
    pub fn from_env() -> Self {
        if let Some(raw) = non_empty_var(env_vars::IDEA_GEN_CREDENTIALS) {
            return Self::detect(&raw);
        }
        if let Some(path) = non_empty_var(env_vars::GOOGLE_APPLICATION_CREDENTIALS) {
            return Self::FilePath(PathBuf::from(path));
        }
        Self::FilePath(PathBuf::from(defaults::SERVICE_ACCOUNT_PATH))
    }

    /// Load and parse the service account key
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key file cannot be read, or if the
    /// document is not a valid service account key.
    pub fn load(&self) -> AppResult<ServiceAccountKey> {
        let document = match self {
            Self::FilePath(path) => {
                debug!(path = %path.display(), "Reading service account key file");
                fs::read_to_string(path).map_err(|e| {
                    AppError::config_missing(format!(
                        "Cannot read service account key file {}: {e}",
                        path.display()
                    ))
                    .with_source(e)
                })?
            }
            Self::InlineJson(json) => json.clone(),
        };

        let key = ServiceAccountKey::from_json(&document)?;
        info!(
            source = self.kind(),
            client_email = %key.client_email,
            "Loaded service account credentials"
        );
        Ok(key)
    }

    /// Short label for logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FilePath(_) => "file",
            Self::InlineJson(_) => "inline-json",
        }
    }
}

impl Debug for CredentialSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::FilePath(path) => f.debug_tuple("FilePath").field(path).finish(),
            Self::InlineJson(_) => f.debug_tuple("InlineJson").field(&"[REDACTED]").finish(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Google service account key document
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Always `service_account` for keys this loader accepts
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    /// Project that owns the service account
    #[serde(default)]
    pub project_id: Option<String>,
    /// Identifier of the signing key, sent as the JWT `kid`
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// PEM-encoded RSA private key
    pub private_key: String,
    /// Service account email, the JWT issuer
    pub client_email: String,
    /// OAuth token endpoint
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Parse a key document
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the JSON is malformed, is not a
    /// `service_account` key, or lacks a private key or client email.
    pub fn from_json(document: &str) -> AppResult<Self> {
        let key: Self = serde_json::from_str(document).map_err(|e| {
            AppError::config_invalid(format!("Service account key is not valid JSON: {e}"))
                .with_source(e)
        })?;

        if let Some(kind) = key.key_type.as_deref() {
            if kind != "service_account" {
                return Err(AppError::config_invalid(format!(
                    "Expected a service_account key, found '{kind}'"
                )));
            }
        }
        if key.private_key.trim().is_empty() {
            return Err(AppError::config_invalid(
                "Service account key has an empty private_key",
            ));
        }
        if key.client_email.trim().is_empty() {
            return Err(AppError::config_invalid(
                "Service account key has an empty client_email",
            ));
        }

        Ok(key)
    }

    /// OAuth token endpoint for this key
    #[must_use]
    pub fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(defaults::TOKEN_URI)
    }
}

impl Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
