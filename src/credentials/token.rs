// ABOUTME: OAuth access tokens for a service account using the JWT bearer grant
// ABOUTME: Signs RS256 assertions, exchanges them for access tokens, and caches until near expiry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use idea_core::constants::service_names;
use idea_core::errors::{AppError, AppResult};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::ServiceAccountKey;

/// Refresh tokens 5 minutes before Google says they expire
const TOKEN_REFRESH_BUFFER_SECS: u64 = 300;

/// Lifetime requested for each signed assertion
const ASSERTION_LIFETIME_SECS: i64 = 3600;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Source of bearer tokens for Google API calls
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Return a currently valid access token
    ///
    /// # Errors
    ///
    /// Returns an error when no token can be obtained.
    async fn access_token(&self) -> AppResult<String>;
}

/// Claims of the signed assertion sent to the token endpoint
#[derive(Debug, Serialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Service account credentials restricted to a fixed scope set
///
/// Each instance owns its own token cache, so the generation and rating
/// credentials refresh independently.
pub struct ScopedCredentials {
    key: Arc<ServiceAccountKey>,
    scopes: Vec<String>,
    client: Client,
    cached_token: RwLock<Option<CachedToken>>,
}

impl ScopedCredentials {
    /// Build credentials for `scopes` backed by `key`
    #[must_use]
    pub fn new(key: Arc<ServiceAccountKey>, scopes: &[&str], client: Client) -> Self {
        Self {
            key,
            scopes: scopes.iter().map(|s| (*s).to_owned()).collect(),
            client,
            cached_token: RwLock::new(None),
        }
    }

    /// Build the signed JWT assertion for the token exchange
    fn signed_assertion(&self) -> AppResult<String> {
        let issued_at = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: self.key.client_email.clone(),
            scope: self.scopes.join(" "),
            aud: self.key.token_uri().to_owned(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid.clone_from(&self.key.private_key_id);

        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| {
                AppError::config_invalid(format!("Service account private key is unusable: {e}"))
                    .with_source(e)
            })?;

        encode(&header, &claims, &signing_key).map_err(|e| {
            AppError::internal(format!("Failed to sign token assertion: {e}")).with_source(e)
        })
    }

    /// Exchange a fresh assertion for an access token
    #[instrument(skip(self), fields(scopes = %self.scopes.join(" ")))]
    async fn fetch_new_token(&self) -> AppResult<CachedToken> {
        let assertion = self.signed_assertion()?;

        let response = self
            .client
            .post(self.key.token_uri())
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| {
                AppError::external_unavailable(
                    service_names::GOOGLE_OAUTH,
                    format!("Token request failed: {e}"),
                )
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_unavailable(
                service_names::GOOGLE_OAUTH,
                format!("Failed to read token response: {e}"),
            )
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<TokenErrorResponse>(&body).map_or_else(
                |_| body.clone(),
                |e| match e.error_description {
                    Some(description) => format!("{}: {description}", e.error),
                    None => e.error,
                },
            );
            warn!(status = %status, "Service account token exchange rejected");
            return Err(AppError::external_auth(
                service_names::GOOGLE_OAUTH,
                format!("Token exchange failed ({status}): {detail}"),
            ));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            AppError::external_service(
                service_names::GOOGLE_OAUTH,
                format!("Unexpected token response: {e}"),
            )
        })?;

        let lifetime = token
            .expires_in
            .unwrap_or(ASSERTION_LIFETIME_SECS.unsigned_abs())
            .saturating_sub(TOKEN_REFRESH_BUFFER_SECS);
        debug!(lifetime_secs = lifetime, "Obtained service account access token");

        Ok(CachedToken {
            token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }
}

#[async_trait]
impl AccessTokenProvider for ScopedCredentials {
    async fn access_token(&self) -> AppResult<String> {
        {
            let cache = self.cached_token.read().await;
            if let Some(ref cached) = *cache {
                if cached.expires_at > Instant::now() {
                    return Ok(cached.token.clone());
                }
            }
        }

        let fresh = self.fetch_new_token().await?;
        let token = fresh.token.clone();
        *self.cached_token.write().await = Some(fresh);
        Ok(token)
    }
}

impl Debug for ScopedCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedCredentials")
            .field("client_email", &self.key.client_email)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}
