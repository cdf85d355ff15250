//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::{BackendClient, CatalogBackend};
use crate::page::Storefront;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and gives handlers access to
/// the single try-on page and the backend it loads from. Generic over the
/// backend so routes can be exercised against in-memory fakes.
pub struct AppState<B = BackendClient> {
    inner: Arc<Storefront<B>>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: CatalogBackend> AppState<B> {
    /// Create a new application state around a page.
    #[must_use]
    pub fn new(page: Storefront<B>) -> Self {
        Self {
            inner: Arc::new(page),
        }
    }

    /// Get a reference to the try-on page.
    #[must_use]
    pub fn page(&self) -> &Storefront<B> {
        &self.inner
    }

    /// Get a reference to the backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        self.inner.backend()
    }

    /// Shared handle to the page, for background tasks.
    #[must_use]
    pub fn page_handle(&self) -> Arc<Storefront<B>> {
        Arc::clone(&self.inner)
    }
}
