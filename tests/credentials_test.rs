// ABOUTME: Integration tests for service account credential loading and token exchange
// ABOUTME: Covers source detection, key parsing, signed assertions, caching, and rejected grants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod helpers;

use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use helpers::google_stub::{
    service_account_json, GoogleStub, StubConfig, STUB_ACCESS_TOKEN, TEST_CLIENT_EMAIL,
};
use reqwest::Client;
use serial_test::serial;
use startup_idea_generator::credentials::{
    AccessTokenProvider, CredentialSource, ScopedCredentials,
};
use startup_idea_generator::ErrorCode;

const CLOUD_PLATFORM: &str = "https://www.googleapis.com/auth/cloud-platform";
const SPREADSHEETS: &str = "https://www.googleapis.com/auth/spreadsheets";
const DRIVE: &str = "https://www.googleapis.com/auth/drive";

fn credentials(stub: &GoogleStub, scopes: &[&str]) -> ScopedCredentials {
    let key = CredentialSource::detect(&service_account_json(&stub.token_uri()))
        .load()
        .unwrap();
    ScopedCredentials::new(Arc::new(key), scopes, Client::new())
}

fn clear_credential_vars() {
    env::remove_var("IDEA_GEN_CREDENTIALS");
    env::remove_var("GOOGLE_APPLICATION_CREDENTIALS");
}

#[test]
fn test_detect_inline_json_and_path() {
    let inline = CredentialSource::detect("  {\"type\": \"service_account\"}");
    assert_eq!(inline.kind(), "inline-json");

    let path = CredentialSource::detect("/secrets/service-account.json");
    assert_eq!(
        path,
        CredentialSource::FilePath(PathBuf::from("/secrets/service-account.json"))
    );
}

#[test]
fn test_load_from_key_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(service_account_json("https://oauth2.googleapis.com/token").as_bytes())
        .unwrap();

    let source = CredentialSource::detect(file.path().to_str().unwrap());
    let key = source.load().unwrap();

    assert_eq!(source.kind(), "file");
    assert_eq!(key.client_email, TEST_CLIENT_EMAIL);
    assert_eq!(key.private_key_id.as_deref(), Some("test-key-1"));
    assert_eq!(key.token_uri(), "https://oauth2.googleapis.com/token");
}

#[test]
fn test_load_rejects_invalid_documents() {
    let error = CredentialSource::detect("{not json").load().unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);

    let error = CredentialSource::detect(r#"{"type": "authorized_user", "client_id": "x"}"#)
        .load()
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigInvalid);
}

#[test]
fn test_missing_key_file_is_config_missing() {
    let error = CredentialSource::detect("/nonexistent/key.json")
        .load()
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ConfigMissing);
}

#[test]
fn test_debug_never_prints_inline_secret() {
    let source = CredentialSource::detect(&service_account_json("https://example.test/token"));
    let printed = format!("{source:?}");
    assert!(printed.contains("[REDACTED]"));
    assert!(!printed.contains("PRIVATE KEY"));
}

#[test]
#[serial]
fn test_from_env_prefers_idea_gen_credentials() {
    clear_credential_vars();
    env::set_var("IDEA_GEN_CREDENTIALS", "{\"type\": \"service_account\"}");
    env::set_var("GOOGLE_APPLICATION_CREDENTIALS", "/var/keys/other.json");

    assert_eq!(CredentialSource::from_env().kind(), "inline-json");

    clear_credential_vars();
}

#[test]
#[serial]
fn test_from_env_falls_back_to_google_variable_then_default() {
    clear_credential_vars();
    env::set_var("GOOGLE_APPLICATION_CREDENTIALS", "/var/keys/other.json");
    assert_eq!(
        CredentialSource::from_env(),
        CredentialSource::FilePath(PathBuf::from("/var/keys/other.json"))
    );

    clear_credential_vars();
    env::set_var("IDEA_GEN_CREDENTIALS", "   ");
    assert_eq!(
        CredentialSource::from_env(),
        CredentialSource::FilePath(PathBuf::from("/secrets/service-account.json"))
    );

    clear_credential_vars();
}

#[tokio::test]
async fn test_token_exchange_sends_signed_assertion() {
    let stub = GoogleStub::start(StubConfig::default()).await;
    let credentials = credentials(&stub, &[SPREADSHEETS, DRIVE]);

    let token = credentials.access_token().await.unwrap();

    assert_eq!(token, STUB_ACCESS_TOKEN);
    let requests = stub.requests_to("/token");
    assert_eq!(requests.len(), 1);
    let body = &requests[0].body;
    assert_eq!(
        body["grant_type"],
        "urn:ietf:params:oauth:grant-type:jwt-bearer"
    );
    let claims = &body["claims"];
    assert_eq!(claims["iss"], TEST_CLIENT_EMAIL);
    assert_eq!(claims["scope"], format!("{SPREADSHEETS} {DRIVE}"));
    assert_eq!(claims["aud"], stub.token_uri());
    assert_eq!(
        claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(),
        3600
    );
}

#[tokio::test]
async fn test_token_is_cached_between_calls() {
    let stub = GoogleStub::start(StubConfig::default()).await;
    let credentials = credentials(&stub, &[CLOUD_PLATFORM]);

    credentials.access_token().await.unwrap();
    credentials.access_token().await.unwrap();

    assert_eq!(stub.requests_to("/token").len(), 1);
}

#[tokio::test]
async fn test_scoped_credentials_keep_separate_caches() {
    let stub = GoogleStub::start(StubConfig::default()).await;
    let vertex = credentials(&stub, &[CLOUD_PLATFORM]);
    let sheets = credentials(&stub, &[SPREADSHEETS, DRIVE]);

    vertex.access_token().await.unwrap();
    sheets.access_token().await.unwrap();

    let scopes: Vec<String> = stub
        .requests_to("/token")
        .iter()
        .map(|r| r.body["claims"]["scope"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(scopes, vec![CLOUD_PLATFORM.to_owned(), format!("{SPREADSHEETS} {DRIVE}")]);
}

#[tokio::test]
async fn test_rejected_grant_is_auth_failure() {
    let stub = GoogleStub::start(StubConfig {
        token_status: StatusCode::BAD_REQUEST,
        ..StubConfig::default()
    })
    .await;
    let credentials = credentials(&stub, &[CLOUD_PLATFORM]);

    let error = credentials.access_token().await.unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalAuthFailed);
    assert!(error.message.contains("invalid_grant"));
}
