//! User profile route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use fashionary_core::UserId;
use tracing::instrument;

use super::views::ProfileView;
use crate::backend::CatalogBackend;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Profile index template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersIndexTemplate {
    pub ids: Vec<String>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/show.html")]
pub struct UserShowTemplate {
    pub profile: ProfileView,
}

/// List every user id with a link to its profile.
#[instrument(skip(state))]
pub async fn index<B: CatalogBackend>(
    State(state): State<AppState<B>>,
) -> Result<impl IntoResponse> {
    let ids = state.backend().all_user_ids().await?;

    Ok(UsersIndexTemplate {
        ids: ids.into_iter().map(UserId::into_inner).collect(),
    })
}

/// Display a user profile. A user the backend does not know is a 404.
#[instrument(skip(state))]
pub async fn show<B: CatalogBackend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = UserId::new(id);
    if id.is_blank() {
        return Err(AppError::BadRequest("user id is required".to_string()));
    }

    let display = state.backend().user_display(&id).await.map_err(|e| {
        if e.is_not_found() {
            AppError::NotFound(format!("user {id}"))
        } else {
            AppError::Backend(e)
        }
    })?;

    Ok(UserShowTemplate {
        profile: ProfileView::from(&display),
    })
}
