//! Catalog inspection commands.
//!
//! # Usage
//!
//! ```bash
//! fash-cli products
//! fash-cli products --sort-by stock --order desc
//! fash-cli users
//! fash-cli user-ids
//! fash-cli user <id>
//! ```

use std::io::{self, Write};

use fashionary_core::{Product, User, UserDisplay, UserId};
use fashionary_storefront::backend::{BackendError, CatalogBackend, SortField, SortOrder};
use thiserror::Error;

/// Errors that can occur while inspecting the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Backend request failed.
    #[error("Backend request failed: {0}")]
    Backend(#[from] BackendError),

    /// Writing the report failed.
    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    /// Serializing a record failed.
    #[error("Failed to serialize record: {0}")]
    Json(#[from] serde_json::Error),
}

/// List products, optionally sorted by the backend.
pub async fn products<B: CatalogBackend>(
    backend: &B,
    sort: Option<(SortField, SortOrder)>,
) -> Result<(), CatalogError> {
    let products = match sort {
        Some((field, order)) => backend.list_products_sorted(field, order).await?,
        None => backend.list_products().await?,
    };
    tracing::info!(count = products.len(), "Fetched products");
    write_products(&mut io::stdout().lock(), &products)?;
    Ok(())
}

/// List user summaries.
pub async fn users<B: CatalogBackend>(backend: &B) -> Result<(), CatalogError> {
    let users = backend.list_users().await?;
    tracing::info!(count = users.len(), "Fetched users");
    write_users(&mut io::stdout().lock(), &users)?;
    Ok(())
}

/// List every user id, one per line.
pub async fn user_ids<B: CatalogBackend>(backend: &B) -> Result<(), CatalogError> {
    let ids = backend.all_user_ids().await?;
    let mut out = io::stdout().lock();
    for id in ids {
        writeln!(out, "{id}")?;
    }
    Ok(())
}

/// Show a user's display record as JSON, with the image summarized.
pub async fn user<B: CatalogBackend>(backend: &B, id: &str) -> Result<(), CatalogError> {
    let display = backend.user_display(&UserId::new(id)).await?;
    write_user(&mut io::stdout().lock(), &display)?;
    Ok(())
}

fn write_products(out: &mut impl Write, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }
    writeln!(
        out,
        "{:<38} {:<12} {:>10} {:>6}  {}",
        "ID", "TYPE", "PRICE", "STOCK", "STATUS"
    )?;
    for product in products {
        writeln!(
            out,
            "{:<38} {:<12} {:>10} {:>6}  {}",
            product.id,
            product.product_type,
            product.display_price(),
            product.stock,
            product.stock_status()
        )?;
    }
    Ok(())
}

fn write_users(out: &mut impl Write, users: &[User]) -> io::Result<()> {
    if users.is_empty() {
        return writeln!(out, "No users found.");
    }
    for user in users {
        let styles = user.style_preferences.join(", ");
        writeln!(out, "{:<38} {:<24} {styles}", user.id, user.name)?;
    }
    Ok(())
}

fn write_user(out: &mut impl Write, display: &UserDisplay) -> Result<(), CatalogError> {
    writeln!(out, "{}", serde_json::to_string_pretty(&display.user)?)?;
    match display.image_data_url() {
        Ok(image) => writeln!(
            out,
            "image: {} ({} base64 chars)",
            image.mime_type(),
            image.payload().len()
        )?,
        Err(e) => writeln!(out, "image: unreadable ({e})")?,
    }
    Ok(())
}
