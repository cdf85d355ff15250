//! Catalog loader.
//!
//! Fetches the product list, then every product's display record, and the
//! user list. The two chains are independent: one failing never blocks or
//! clears the other.

use fashionary_core::{ProductDisplay, User};
use futures::future::{join_all, try_join_all};
use tracing::{error, info, instrument, warn};

use crate::backend::CatalogBackend;
use crate::config::DisplayFailurePolicy;

/// Message shown when the product branch fails.
pub const PRODUCTS_ERROR: &str = "Failed to fetch products";

/// Message shown when the user branch fails.
pub const USERS_ERROR: &str = "Failed to fetch users";

/// Category key matching every product.
pub const ALL_CATEGORIES: &str = "all";

/// State of one independently loaded collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch<T> {
    /// Fetch in flight; render a placeholder.
    Loading,
    /// Fetch finished. An empty list is a valid "none found" state.
    Loaded(Vec<T>),
    /// Fetch failed with a user-facing message.
    Failed(String),
}

impl<T> Default for Branch<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> Branch<T> {
    /// Returns true while the branch is loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded items, or an empty slice while loading or failed.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Loaded(items) => items,
            Self::Loading | Self::Failed(_) => &[],
        }
    }

    /// Returns true if the branch loaded successfully with no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Loaded(items) if items.is_empty())
    }

    /// The failure message, if the branch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Loading | Self::Loaded(_) => None,
        }
    }
}

/// Load the product branch.
///
/// Lists products, then issues one display fetch per product concurrently.
/// With [`DisplayFailurePolicy::Abort`] the first failed display fetch fails
/// the whole branch; with [`DisplayFailurePolicy::Skip`] failed products are
/// dropped from the list.
#[instrument(skip(backend))]
pub async fn load_products<B: CatalogBackend>(
    backend: &B,
    policy: DisplayFailurePolicy,
) -> Branch<ProductDisplay> {
    let summaries = match backend.list_products().await {
        Ok(summaries) => summaries,
        Err(e) => {
            error!(error = %e, "Failed to list products");
            return Branch::Failed(PRODUCTS_ERROR.to_string());
        }
    };

    let fetches: Vec<_> = summaries
        .iter()
        .map(|product| backend.product_display(&product.id))
        .collect();

    match policy {
        DisplayFailurePolicy::Abort => match try_join_all(fetches).await {
            Ok(products) => {
                info!(count = products.len(), "Product catalog loaded");
                Branch::Loaded(products)
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch product display record");
                Branch::Failed(PRODUCTS_ERROR.to_string())
            }
        },
        DisplayFailurePolicy::Skip => {
            let results = join_all(fetches).await;
            let total = results.len();
            let products: Vec<ProductDisplay> = results
                .into_iter()
                .zip(&summaries)
                .filter_map(|(result, summary)| {
                    result
                        .map_err(|e| {
                            warn!(
                                product_id = %summary.id,
                                error = %e,
                                "Skipping product without display record"
                            );
                        })
                        .ok()
                })
                .collect();
            info!(
                count = products.len(),
                skipped = total - products.len(),
                "Product catalog loaded"
            );
            Branch::Loaded(products)
        }
    }
}

/// Load the user branch.
#[instrument(skip(backend))]
pub async fn load_users<B: CatalogBackend>(backend: &B) -> Branch<User> {
    match backend.list_users().await {
        Ok(users) => {
            info!(count = users.len(), "Users loaded");
            Branch::Loaded(users)
        }
        Err(e) => {
            error!(error = %e, "Failed to list users");
            Branch::Failed(USERS_ERROR.to_string())
        }
    }
}

/// Category filter options: `"all"` followed by each distinct lowercased
/// product type in first-seen order.
#[must_use]
pub fn categories(products: &[ProductDisplay]) -> Vec<String> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    for product in products {
        let category = product.category();
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    categories
}

/// Normalize a requested category against the loaded catalog.
///
/// Missing, blank or unknown categories resolve to `"all"`.
#[must_use]
pub fn resolve_category(products: &[ProductDisplay], requested: Option<&str>) -> String {
    let requested = requested.map(|c| c.trim().to_lowercase()).unwrap_or_default();
    if categories(products).contains(&requested) {
        requested
    } else {
        ALL_CATEGORIES.to_string()
    }
}

/// Products belonging to `category` (case-insensitive), or all of them for `"all"`.
#[must_use]
pub fn filter_by_category<'a>(
    products: &'a [ProductDisplay],
    category: &str,
) -> Vec<&'a ProductDisplay> {
    let category = category.to_lowercase();
    products
        .iter()
        .filter(|p| category == ALL_CATEGORIES || p.category() == category)
        .collect()
}
