//! Catalog and try-on backend API.
//!
//! # Architecture
//!
//! - The backend is the only source of truth; nothing is persisted locally
//! - [`CatalogBackend`] is the seam between page orchestration and HTTP, so
//!   the orchestration can be exercised against in-memory fakes
//! - [`BackendClient`] is the `reqwest` implementation used in production
//!
//! # Endpoints
//!
//! ```text
//! GET  /products                 - Product summaries (?sort_by=&order=)
//! GET  /products/{id}            - Single product summary
//! GET  /products/{id}/display    - Product with embedded image
//! GET  /users                    - User summaries
//! GET  /users/{id}/display       - User with embedded image
//! GET  /users/all_ids            - Every user identifier
//! POST /api/v1/tryon/generate    - Composite a user and a product image
//! ```

mod client;

pub use client::BackendClient;

use std::future::Future;

use fashionary_core::{
    Product, ProductDisplay, ProductId, TryOnRequest, TryOnResponse, User, UserDisplay, UserId,
};
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The request never completed (connection refused, DNS, timeout, reset).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status.
    #[error("Backend returned status {status}{}", format_detail(.detail.as_deref()))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail` field of the error body, if one could be parsed.
        detail: Option<String>,
    },

    /// A 2xx response whose body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The request URL could not be built.
    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),
}

fn format_detail(detail: Option<&str>) -> String {
    detail.map_or_else(String::new, |d| format!(": {d}"))
}

impl BackendError {
    /// Human-readable message for the page.
    ///
    /// Prefers the server-supplied detail, then falls back to the status code
    /// or the transport description.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Status {
                status,
                detail: None,
            } => format!("request failed with status {status}"),
            Self::Transport(message) => format!("could not reach the server ({message})"),
            Self::Decode(_) => "the server returned an unreadable response".to_string(),
            Self::InvalidUrl(message) => format!("invalid request ({message})"),
        }
    }

    /// Returns true for a 404 response.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Field accepted by the backend's `sort_by` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Stock,
    Price,
    CreatedAt,
}

impl SortField {
    /// Wire value of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stock => "stock",
            Self::Price => "price",
            Self::CreatedAt => "created_at",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock" => Ok(Self::Stock),
            "price" => Ok(Self::Price),
            "created_at" => Ok(Self::CreatedAt),
            _ => Err(format!(
                "invalid sort field: {s} (expected stock, price or created_at)"
            )),
        }
    }
}

/// Sort direction for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire value of the order.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("invalid sort order: {s} (expected asc or desc)")),
        }
    }
}

/// Operations the storefront needs from the backend.
///
/// Every returned future is `Send` so orchestration can run inside Axum
/// handlers and spawned tasks.
pub trait CatalogBackend: Send + Sync {
    /// `GET /products`
    fn list_products(&self) -> impl Future<Output = Result<Vec<Product>, BackendError>> + Send;

    /// `GET /products?sort_by=&order=`
    fn list_products_sorted(
        &self,
        field: SortField,
        order: SortOrder,
    ) -> impl Future<Output = Result<Vec<Product>, BackendError>> + Send;

    /// `GET /products/{id}`
    fn get_product(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<Product, BackendError>> + Send;

    /// `GET /products/{id}/display`
    fn product_display(
        &self,
        id: &ProductId,
    ) -> impl Future<Output = Result<ProductDisplay, BackendError>> + Send;

    /// `GET /users`
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, BackendError>> + Send;

    /// `GET /users/{id}/display`
    fn user_display(
        &self,
        id: &UserId,
    ) -> impl Future<Output = Result<UserDisplay, BackendError>> + Send;

    /// `GET /users/all_ids`
    fn all_user_ids(&self) -> impl Future<Output = Result<Vec<UserId>, BackendError>> + Send;

    /// `POST /api/v1/tryon/generate`
    fn generate_try_on(
        &self,
        request: &TryOnRequest,
    ) -> impl Future<Output = Result<TryOnResponse, BackendError>> + Send;
}
