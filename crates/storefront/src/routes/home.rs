//! Try-on page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use tracing::instrument;

use super::views::{CatalogView, ModelPanelView, TryOnPanelView};
use crate::backend::CatalogBackend;
use crate::filters;
use crate::page::PageSnapshot;
use crate::state::AppState;

/// Query parameters for the try-on page.
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub category: Option<String>,
}

/// Try-on page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Catalog grid and category filter.
    pub catalog: CatalogView,
    /// Model picker and the selected model.
    pub models: ModelPanelView,
    /// Generate trigger and result.
    pub try_on: TryOnPanelView,
}

impl HomeTemplate {
    /// Render the page with the grid filtered to `category`.
    #[must_use]
    pub fn new(page: &PageSnapshot, category: Option<&str>) -> Self {
        Self {
            catalog: CatalogView::new(page, category),
            models: ModelPanelView::from(page),
            try_on: TryOnPanelView::from(page),
        }
    }
}

/// Display the try-on page.
#[instrument(skip(state))]
pub async fn home<B: CatalogBackend>(
    State(state): State<AppState<B>>,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    HomeTemplate::new(&state.page().snapshot(), query.category.as_deref())
}

/// Re-run the catalog loader, then go back to the page.
#[instrument(skip(state))]
pub async fn reload<B: CatalogBackend>(State(state): State<AppState<B>>) -> Redirect {
    state.page().load_catalog().await;
    Redirect::to("/")
}
