//! Fashionary Storefront library.
//!
//! This crate provides the catalog and virtual try-on storefront as a
//! library, allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod filters;
pub mod page;
pub mod routes;
pub mod state;

use axum::Router;
use sentry_tower::{NewSentryLayer, SentryHttpLayer};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::backend::CatalogBackend;
use crate::state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the full application router with static files, tracing and Sentry
/// layers applied.
pub fn app<B: CatalogBackend + 'static>(state: AppState<B>) -> Router {
    routes::routes()
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Sentry layers (outermost for full request coverage)
        .layer(NewSentryLayer::new_from_top())
        .layer(SentryHttpLayer::new().enable_transaction())
}
