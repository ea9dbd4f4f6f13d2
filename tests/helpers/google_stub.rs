// ABOUTME: Local stand-in for the Google token, Vertex AI, Drive, and Sheets endpoints
// ABOUTME: Serves canned responses on an ephemeral port and records every request it receives

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Form, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Private key of the test service account (PKCS#8)
pub const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/test_service_account_key.pem");

/// Public half of [`TEST_PRIVATE_KEY`]
pub const TEST_PUBLIC_KEY: &str = include_str!("../fixtures/test_service_account_pub.pem");

/// Client email of the test service account
pub const TEST_CLIENT_EMAIL: &str = "idea-generator@my-project-ai-idea.iam.gserviceaccount.com";

/// Bearer token handed out by the stand-in token endpoint
pub const STUB_ACCESS_TOKEN: &str = "stub-access-token";

/// Service account key document pointing at `token_uri`
pub fn service_account_json(token_uri: &str) -> String {
    json!({
        "type": "service_account",
        "project_id": "my-project-ai-idea",
        "private_key_id": "test-key-1",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": TEST_CLIENT_EMAIL,
        "client_id": "1234567890",
        "token_uri": token_uri
    })
    .to_string()
}

/// One request seen by the stand-in
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Canned behavior of the stand-in
#[derive(Debug, Clone)]
pub struct StubConfig {
    pub token_status: StatusCode,
    pub vertex_status: StatusCode,
    pub vertex_body: Value,
    pub spreadsheet_ids: Vec<String>,
    pub worksheet_title: String,
    pub append_status: StatusCode,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            token_status: StatusCode::OK,
            vertex_status: StatusCode::OK,
            vertex_body: vertex_text_response(&["# Idea 1: Stub\n"]),
            spreadsheet_ids: vec!["sheet-123".to_owned()],
            worksheet_title: "Ratings".to_owned(),
            append_status: StatusCode::OK,
        }
    }
}

/// `generateContent` response whose first candidate carries `parts`
pub fn vertex_text_response(parts: &[&str]) -> Value {
    let parts: Vec<Value> = parts.iter().map(|text| json!({ "text": text })).collect();
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }],
        "usageMetadata": {
            "promptTokenCount": 412,
            "candidatesTokenCount": 980,
            "totalTokenCount": 1392
        }
    })
}

/// Google-style error envelope
pub fn google_error(code: u16, message: &str, status: &str) -> Value {
    json!({ "error": { "code": code, "message": message, "status": status } })
}

struct StubState {
    config: StubConfig,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubState {
    fn record(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: Value) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            path: uri.path().to_owned(),
            query: uri.query().map(ToOwned::to_owned),
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(ToOwned::to_owned),
            body,
        });
    }
}

/// Running stand-in server
pub struct GoogleStub {
    pub base_url: String,
    state: Arc<StubState>,
}

impl GoogleStub {
    pub async fn start(config: StubConfig) -> Self {
        let state = Arc::new(StubState {
            config,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/token", post(token))
            .route(
                "/v1/projects/:project/locations/:region/publishers/google/models/:call",
                post(generate_content),
            )
            .route("/drive/files", get(drive_files))
            .route("/sheets/spreadsheets/:id", get(spreadsheet_metadata))
            .route("/sheets/spreadsheets/:id/values/:call", post(append_values))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn token_uri(&self) -> String {
        format!("{}/token", self.base_url)
    }

    pub fn drive_base(&self) -> String {
        format!("{}/drive", self.base_url)
    }

    pub fn sheets_base(&self) -> String {
        format!("{}/sheets", self.base_url)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }
}

async fn token(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    let assertion = form.get("assertion").cloned().unwrap_or_default();
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_aud = false;
    let claims = decode::<Value>(
        &assertion,
        &DecodingKey::from_rsa_pem(TEST_PUBLIC_KEY.as_bytes()).unwrap(),
        &validation,
    )
    .map(|data| data.claims)
    .unwrap_or(Value::Null);

    state.record(
        Method::POST,
        &uri,
        &headers,
        json!({ "grant_type": form.get("grant_type"), "claims": claims }),
    );

    if state.config.token_status != StatusCode::OK {
        return (
            state.config.token_status,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid JWT Signature." })),
        );
    }
    if claims.is_null() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Bad assertion" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "access_token": STUB_ACCESS_TOKEN, "expires_in": 3599, "token_type": "Bearer" })),
    )
}

async fn generate_content(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.record(Method::POST, &uri, &headers, body);
    (state.config.vertex_status, Json(state.config.vertex_body.clone()))
}

async fn drive_files(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.record(Method::GET, &uri, &headers, Value::Null);
    let files: Vec<Value> = state
        .config
        .spreadsheet_ids
        .iter()
        .map(|id| json!({ "id": id, "name": "Idea Generator Ratings" }))
        .collect();
    Json(json!({ "files": files }))
}

async fn spreadsheet_metadata(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.record(Method::GET, &uri, &headers, Value::Null);
    Json(json!({
        "sheets": [
            { "properties": { "sheetId": 0, "title": state.config.worksheet_title, "index": 0 } },
            { "properties": { "sheetId": 77, "title": "Archive", "index": 1 } }
        ]
    }))
}

async fn append_values(
    State(state): State<Arc<StubState>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.record(Method::POST, &uri, &headers, body);
    if state.config.append_status != StatusCode::OK {
        return (
            state.config.append_status,
            Json(google_error(
                state.config.append_status.as_u16(),
                "The caller does not have permission",
                "PERMISSION_DENIED",
            )),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "spreadsheetId": "sheet-123",
            "updates": { "updatedRows": 1, "updatedColumns": 5, "updatedCells": 5 }
        })),
    )
}
