// ABOUTME: Page route handlers for generating, rating, and clearing startup ideas
// ABOUTME: Runs each action while holding its session and renders the resulting page
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::{headers::Cookie, TypedHeader};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::page::{parse_number, render_page, GenerateForm, GenerateInput, PageView};
use super::sessions::{SessionLock, SessionStore};
use crate::actions::{ActionOutcome, IdeaGenerator};

/// Shared state of the page routes
#[derive(Debug)]
pub struct PageContext {
    /// Action runner
    pub actions: IdeaGenerator,
    /// Live sessions
    pub sessions: SessionStore,
}

impl PageContext {
    /// Context with an empty session store
    #[must_use]
    pub fn new(actions: IdeaGenerator) -> Self {
        Self {
            actions,
            sessions: SessionStore::new(),
        }
    }
}

/// Rate form body as submitted
#[derive(Debug, Default, Deserialize)]
pub struct RateForm {
    /// Submitted star value
    #[serde(default)]
    pub stars: String,
}

/// Idea page routes
pub struct IdeaRoutes;

impl IdeaRoutes {
    /// Create the page and form routes
    pub fn routes(context: Arc<PageContext>) -> Router {
        Router::new()
            .route("/", get(Self::show_page))
            .route("/generate", post(Self::generate))
            .route("/rate", post(Self::rate))
            .route("/clear", post(Self::clear))
            .with_state(context)
    }

    async fn show_page(
        State(context): State<Arc<PageContext>>,
        cookie: Option<TypedHeader<Cookie>>,
    ) -> Response {
        let id = session_id(cookie.as_ref());
        let state = context.sessions.snapshot(id).await;
        let html = render_page(&PageView {
            state: &state,
            form: &GenerateForm::default(),
            feedback: &[],
        });
        respond(id, html)
    }

    async fn generate(
        State(context): State<Arc<PageContext>>,
        cookie: Option<TypedHeader<Cookie>>,
        Form(input): Form<GenerateInput>,
    ) -> Response {
        let id = session_id(cookie.as_ref());
        info!(session = %id, field = %input.field, idea_count = %input.idea_count, "Generate requested");

        let session = context.sessions.lock(id).await;
        let state = (*session).clone();
        let (form, outcome) = match input.parse() {
            Ok(form) => {
                let outcome = context
                    .actions
                    .generate(state, &form.field, form.idea_count, form.temperature)
                    .await;
                (form, outcome)
            }
            Err(e) => (input.fallback(), ActionOutcome::rejected(state, &e)),
        };
        finish(&context, session, &form, outcome)
    }

    async fn rate(
        State(context): State<Arc<PageContext>>,
        cookie: Option<TypedHeader<Cookie>>,
        Form(form): Form<RateForm>,
    ) -> Response {
        let id = session_id(cookie.as_ref());
        debug!(session = %id, stars = %form.stars, "Rating submitted");

        let session = context.sessions.lock(id).await;
        let state = (*session).clone();
        let outcome = match parse_number("Rating", &form.stars) {
            Ok(stars) => context.actions.rate(state, stars).await,
            Err(e) => ActionOutcome::rejected(state, &e),
        };
        finish(&context, session, &GenerateForm::default(), outcome)
    }

    async fn clear(
        State(context): State<Arc<PageContext>>,
        cookie: Option<TypedHeader<Cookie>>,
    ) -> Response {
        let id = session_id(cookie.as_ref());
        let session = context.sessions.lock(id).await;
        let outcome = context.actions.clear((*session).clone());
        finish(&context, session, &GenerateForm::default(), outcome)
    }
}

/// Existing session id from the cookie, or a fresh one
fn session_id(cookie: Option<&TypedHeader<Cookie>>) -> Uuid {
    SessionStore::session_id(cookie.map(|TypedHeader(c)| c)).unwrap_or_else(Uuid::new_v4)
}

/// Store the next state, release the session, and render the action feedback
fn finish(
    context: &PageContext,
    session: SessionLock,
    form: &GenerateForm,
    outcome: ActionOutcome,
) -> Response {
    let ActionOutcome {
        state, feedback, ..
    } = outcome;
    let html = render_page(&PageView {
        state: &state,
        form,
        feedback: &feedback,
    });
    let id = session.id();
    context.sessions.release(session, state);
    respond(id, html)
}

fn respond(id: Uuid, html: String) -> Response {
    ([(SET_COOKIE, SessionStore::set_cookie_header(id))], Html(html)).into_response()
}
