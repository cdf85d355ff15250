//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Try-on page (?category= filters the grid)
//! GET  /health                 - Health check
//!
//! # Try-on page (HTMX fragments)
//! POST /select/user            - Pick a model (returns model panel + try-on panel)
//! POST /select/product         - Pick a product (returns catalog + try-on panel)
//! POST /try-on                 - Generate (returns try-on panel)
//! POST /catalog/reload         - Re-run the catalog loader, redirect to /
//!
//! # Profiles
//! GET  /users                  - Profile index
//! GET  /users/{id}             - Profile page
//! ```
//!
//! Fragment routes redirect to `/` when called without the `HX-Request`
//! header, so the page keeps working as plain form posts.

pub mod home;
pub mod selection;
pub mod try_on;
pub mod users;
pub mod views;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};

use crate::backend::CatalogBackend;
use crate::state::AppState;

/// Returns true if the request was issued by HTMX.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("HX-Request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}

/// Create the profile routes router.
pub fn user_routes<B: CatalogBackend + 'static>() -> Router<AppState<B>> {
    Router::new()
        .route("/", get(users::index::<B>))
        .route("/{id}", get(users::show::<B>))
}

/// Create the selection routes router.
pub fn selection_routes<B: CatalogBackend + 'static>() -> Router<AppState<B>> {
    Router::new()
        .route("/user", post(selection::select_user::<B>))
        .route("/product", post(selection::select_product::<B>))
}

/// Create all routes for the storefront.
pub fn routes<B: CatalogBackend + 'static>() -> Router<AppState<B>> {
    Router::new()
        .route("/", get(home::home::<B>))
        .route("/health", get(health))
        .nest("/select", selection_routes())
        .route("/try-on", post(try_on::generate::<B>))
        .route("/catalog/reload", post(home::reload::<B>))
        .nest("/users", user_routes())
}
