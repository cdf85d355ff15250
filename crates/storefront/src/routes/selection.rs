//! Model and product selection handlers (HTMX).
//!
//! Both return the panel they changed plus an out-of-band try-on panel,
//! since any selection change resets the try-on result.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use fashionary_core::{ProductId, UserId};
use serde::Deserialize;
use tracing::instrument;

use super::is_htmx;
use super::views::{CatalogView, ModelPanelView, TryOnPanelView};
use crate::backend::CatalogBackend;
use crate::error::add_breadcrumb;
use crate::state::AppState;

/// Select model form data. An empty id clears the selection.
#[derive(Debug, Deserialize)]
pub struct SelectUserForm {
    #[serde(default)]
    pub user_id: String,
}

/// Select product form data. An empty id clears the selection.
///
/// `category` is the grid filter the form was rendered under, so the
/// returned grid keeps it.
#[derive(Debug, Deserialize)]
pub struct SelectProductForm {
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Model panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "fragments/model_selected.html")]
pub struct ModelSelectedTemplate {
    pub models: ModelPanelView,
    pub try_on: TryOnPanelView,
}

/// Catalog fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "fragments/product_selected.html")]
pub struct ProductSelectedTemplate {
    pub catalog: CatalogView,
    pub try_on: TryOnPanelView,
}

/// Select a model and load its display record.
#[instrument(skip(state, headers))]
pub async fn select_user<B: CatalogBackend>(
    State(state): State<AppState<B>>,
    headers: HeaderMap,
    Form(form): Form<SelectUserForm>,
) -> Response {
    add_breadcrumb("selection", "Selected model", &[("user_id", form.user_id.as_str())]);
    state.page().select_user(Some(UserId::new(form.user_id))).await;

    if !is_htmx(&headers) {
        return Redirect::to("/").into_response();
    }

    let page = state.page().snapshot();
    ModelSelectedTemplate {
        models: ModelPanelView::from(&page),
        try_on: TryOnPanelView::from(&page),
    }
    .into_response()
}

/// Select a product from the loaded catalog.
#[instrument(skip(state, headers))]
pub async fn select_product<B: CatalogBackend>(
    State(state): State<AppState<B>>,
    headers: HeaderMap,
    Form(form): Form<SelectProductForm>,
) -> Response {
    add_breadcrumb(
        "selection",
        "Selected product",
        &[("product_id", form.product_id.as_str())],
    );
    state
        .page()
        .select_product(Some(&ProductId::new(form.product_id)));

    if !is_htmx(&headers) {
        return Redirect::to("/").into_response();
    }

    let page = state.page().snapshot();
    ProductSelectedTemplate {
        catalog: CatalogView::new(&page, form.category.as_deref()),
        try_on: TryOnPanelView::from(&page),
    }
    .into_response()
}
