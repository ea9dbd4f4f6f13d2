// ABOUTME: Environment configuration for the generation backend, rating spreadsheet, and page server
// ABOUTME: Parses environment variables with defaults and reports malformed values as config errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use idea_core::constants::{defaults, env_vars};
use idea_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::credentials::CredentialSource;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Normal operation
    #[default]
    Info,
    /// Request level detail
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Deployed service
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Vertex AI settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    /// GCP project hosting the model
    pub project_id: String,
    /// Vertex AI region
    pub region: String,
    /// Model name
    pub model: String,
    /// Output token limit per generation
    pub max_output_tokens: u32,
}

/// Rating spreadsheet settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingsSettings {
    /// Spreadsheet opened by name
    pub spreadsheet_name: String,
    /// Idea characters copied into each row
    pub excerpt_chars: usize,
}

/// Page server bind settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// Bind address
    pub host: IpAddr,
    /// Bind port
    pub port: u16,
}

impl HttpSettings {
    /// Socket address to listen on
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Log level from `RUST_LOG`
    pub log_level: LogLevel,
    /// Where the service account key comes from
    pub credentials: CredentialSource,
    /// Vertex AI settings
    pub generation: GenerationSettings,
    /// Rating spreadsheet settings
    pub ratings: RatingsSettings,
    /// Page server settings
    pub http: HttpSettings,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Call [`load_dotenv`] first for `.env` values to take part.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a numeric or address variable
    /// cannot be parsed, or when a limit is zero.
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or(
                env_vars::ENVIRONMENT,
                "development",
            )),
            log_level: LogLevel::from_str_or_default(&env_var_or("RUST_LOG", "info")),
            credentials: CredentialSource::from_env(),
            generation: GenerationSettings {
                project_id: env_var_or(env_vars::GCP_PROJECT_ID, defaults::GCP_PROJECT_ID),
                region: env_var_or(env_vars::GCP_REGION, defaults::GCP_REGION),
                model: env_var_or(env_vars::VERTEX_MODEL, defaults::VERTEX_MODEL),
                max_output_tokens: parse_env(
                    env_vars::VERTEX_MAX_OUTPUT_TOKENS,
                    defaults::MAX_OUTPUT_TOKENS,
                )?,
            },
            ratings: RatingsSettings {
                spreadsheet_name: env_var_or(
                    env_vars::RATINGS_SPREADSHEET_NAME,
                    defaults::RATINGS_SPREADSHEET_NAME,
                ),
                excerpt_chars: parse_env(env_vars::RATINGS_EXCERPT_CHARS, defaults::EXCERPT_CHARS)?,
            },
            http: HttpSettings {
                host: parse_env(env_vars::HTTP_HOST, parse_default_host()?)?,
                port: parse_env(env_vars::HTTP_PORT, defaults::HTTP_PORT)?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a configuration error for empty names or zero limits.
    pub fn validate(&self) -> AppResult<()> {
        if self.generation.project_id.trim().is_empty() {
            return Err(AppError::config_invalid(format!(
                "{} must not be empty",
                env_vars::GCP_PROJECT_ID
            )));
        }
        if self.generation.max_output_tokens == 0 {
            return Err(AppError::config_invalid(format!(
                "{} must be greater than zero",
                env_vars::VERTEX_MAX_OUTPUT_TOKENS
            )));
        }
        if self.ratings.spreadsheet_name.trim().is_empty() {
            return Err(AppError::config_invalid(format!(
                "{} must not be empty",
                env_vars::RATINGS_SPREADSHEET_NAME
            )));
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Startup Idea Generator Configuration:\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Credentials: {}\n\
             - Vertex AI: project {} in {} using {} (max {} output tokens)\n\
             - Ratings Spreadsheet: {} (excerpt {} chars)\n\
             - HTTP: {}",
            self.environment,
            self.log_level,
            self.credentials.kind(),
            self.generation.project_id,
            self.generation.region,
            self.generation.model,
            self.generation.max_output_tokens,
            self.ratings.spreadsheet_name,
            self.ratings.excerpt_chars,
            self.http.socket_addr(),
        )
    }
}

/// Apply a `.env` file from the working directory or its parents
///
/// Variables already set in the process win. Returns the file that was
/// applied, if one was found and parsed.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an environment variable, using `default` when it is unset or blank
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map_err(|e| {
            AppError::config_invalid(format!("Invalid {key} value '{raw}': {e}"))
        }),
        _ => Ok(default),
    }
}

fn parse_default_host() -> AppResult<IpAddr> {
    defaults::HTTP_HOST
        .parse()
        .map_err(|e| AppError::internal(format!("Invalid default host: {e}")))
}
