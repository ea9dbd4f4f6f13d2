// ABOUTME: Application constants for Google endpoints, OAuth scopes, and defaults
// ABOUTME: Centralizes values shared by configuration, clients, and presentation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment variable names read at startup
pub mod env_vars {
    /// GCP project hosting the Vertex AI model
    pub const GCP_PROJECT_ID: &str = "GCP_PROJECT_ID";
    /// GCP region for Vertex AI
    pub const GCP_REGION: &str = "GCP_REGION";
    /// Vertex AI model name
    pub const VERTEX_MODEL: &str = "VERTEX_MODEL";
    /// Maximum output tokens for a generation call
    pub const VERTEX_MAX_OUTPUT_TOKENS: &str = "VERTEX_MAX_OUTPUT_TOKENS";
    /// Service account secret: inline JSON or a path to a key file
    pub const IDEA_GEN_CREDENTIALS: &str = "IDEA_GEN_CREDENTIALS";
    /// Conventional Google key file path variable
    pub const GOOGLE_APPLICATION_CREDENTIALS: &str = "GOOGLE_APPLICATION_CREDENTIALS";
    /// Name of the spreadsheet receiving ratings
    pub const RATINGS_SPREADSHEET_NAME: &str = "RATINGS_SPREADSHEET_NAME";
    /// Number of idea characters copied into a rating row
    pub const RATINGS_EXCERPT_CHARS: &str = "RATINGS_EXCERPT_CHARS";
    /// Bind address of the page server
    pub const HTTP_HOST: &str = "HTTP_HOST";
    /// Port of the page server
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Deployment environment name
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Default configuration values
pub mod defaults {
    /// Default GCP project
    pub const GCP_PROJECT_ID: &str = "my-project-ai-idea";
    /// Default Vertex AI region
    pub const GCP_REGION: &str = "us-central1";
    /// Default Gemini model
    pub const VERTEX_MODEL: &str = "gemini-2.5-pro";
    /// Room for three fully detailed ideas with SWOT sections
    pub const MAX_OUTPUT_TOKENS: u32 = 8192;
    /// Key file path used when no secret is provided
    pub const SERVICE_ACCOUNT_PATH: &str = "/secrets/service-account.json";
    /// Spreadsheet receiving ratings
    pub const RATINGS_SPREADSHEET_NAME: &str = "Idea Generator Ratings";
    /// Idea characters copied into a rating row
    pub const EXCERPT_CHARS: usize = 100;
    /// Page server bind address
    pub const HTTP_HOST: &str = "0.0.0.0";
    /// Page server port
    pub const HTTP_PORT: u16 = 8080;
    /// Google OAuth token endpoint when a key file omits `token_uri`
    pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
}

/// Input ranges exposed by the page controls
pub mod limits {
    /// Fewest ideas per generation
    pub const MIN_IDEAS: u8 = 1;
    /// Most ideas per generation
    pub const MAX_IDEAS: u8 = 3;
    /// Idea count preselected on the page
    pub const DEFAULT_IDEAS: u8 = 2;
    /// Lowest creativity setting
    pub const MIN_TEMPERATURE: f32 = 0.5;
    /// Highest creativity setting
    pub const MAX_TEMPERATURE: f32 = 1.2;
    /// Creativity preselected on the page
    pub const DEFAULT_TEMPERATURE: f32 = 0.8;
    /// Slider step for creativity
    pub const TEMPERATURE_STEP: f32 = 0.1;
    /// Lowest star rating
    pub const MIN_STARS: u8 = 1;
    /// Highest star rating
    pub const MAX_STARS: u8 = 5;
    /// Star rating preselected on the page
    pub const DEFAULT_STARS: u8 = 3;
}

/// OAuth scopes requested for each remote service
pub mod scopes {
    /// Vertex AI generation
    pub const CLOUD_PLATFORM: &str = "https://www.googleapis.com/auth/cloud-platform";
    /// Spreadsheet writes
    pub const SPREADSHEETS: &str = "https://www.googleapis.com/auth/spreadsheets";
    /// Spreadsheet lookup by name
    pub const DRIVE: &str = "https://www.googleapis.com/auth/drive";
}

/// Google API base URLs
pub mod endpoints {
    /// Drive v3 API root
    pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";
    /// Sheets v4 API root
    pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
    /// MIME type Drive assigns to native spreadsheets
    pub const SPREADSHEET_MIME_TYPE: &str = "application/vnd.google-apps.spreadsheet";
}

/// Service names used in logs and error messages
pub mod service_names {
    /// This application
    pub const IDEA_GENERATOR: &str = "startup-idea-generator";
    /// Generation backend
    pub const VERTEX_AI: &str = "Vertex AI";
    /// Rating backend
    pub const GOOGLE_SHEETS: &str = "Google Sheets";
    /// Token endpoint
    pub const GOOGLE_OAUTH: &str = "Google OAuth";
}
