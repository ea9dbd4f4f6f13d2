// ABOUTME: Route module organization for the idea generator HTTP server
// ABOUTME: Assembles the page, form, and health routes behind request tracing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes
//!
//! | method | path | purpose |
//! |---|---|---|
//! | `GET` | `/` | render the page for the caller's session |
//! | `POST` | `/generate` | generate ideas |
//! | `POST` | `/rate` | submit a star rating |
//! | `POST` | `/clear` | reset the session |
//! | `GET` | `/health` | liveness |

/// Health check route
pub mod health;
/// Page and form handlers
pub mod ideas;
/// HTML rendering
pub mod page;
/// Cookie-keyed session store
pub mod sessions;

pub use health::HealthRoutes;
pub use ideas::{IdeaRoutes, PageContext};
pub use sessions::{SessionStore, SESSION_COOKIE};

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the complete application router
pub fn router(context: Arc<PageContext>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes())
        .merge(IdeaRoutes::routes(context))
        .layer(TraceLayer::new_for_http())
}
