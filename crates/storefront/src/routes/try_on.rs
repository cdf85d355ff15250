//! Try-on generate handler (HTMX).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use super::is_htmx;
use super::views::TryOnPanelView;
use crate::backend::CatalogBackend;
use crate::error::add_breadcrumb;
use crate::state::AppState;

/// Try-on panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "fragments/try_on.html")]
pub struct TryOnTemplate {
    pub try_on: TryOnPanelView,
}

/// Activate the generate trigger and return the updated panel.
///
/// The response carries an `HX-Trigger` of `try-on-complete` when an image
/// was produced or `try-on-failed` on failure, so other page elements can
/// react. A request superseded by a selection change fires neither.
#[instrument(skip(state, headers))]
pub async fn generate<B: CatalogBackend>(
    State(state): State<AppState<B>>,
    headers: HeaderMap,
) -> Response {
    add_breadcrumb("try-on", "Generate requested", &[]);
    let outcome = state.page().generate().await;

    if !is_htmx(&headers) {
        return Redirect::to("/").into_response();
    }

    let event = if outcome.image_src().is_some() {
        Some("try-on-complete")
    } else if outcome.failure().is_some() {
        Some("try-on-failed")
    } else {
        None
    };
    let page = state.page().snapshot();
    let mut response = TryOnTemplate {
        try_on: TryOnPanelView::from(&page),
    }
    .into_response();
    if let Some(event) = event {
        response
            .headers_mut()
            .insert("HX-Trigger", HeaderValue::from_static(event));
    }
    response
}
