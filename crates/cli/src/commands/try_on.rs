//! Try-on generation command.
//!
//! Fetches both display records, runs the same validation as the storefront
//! page, posts the request, and writes the decoded image bytes to a file.

use std::io;
use std::path::{Path, PathBuf};

use fashionary_core::{DataUrl, DataUrlError, ProductId, UserId};
use fashionary_storefront::backend::{BackendError, CatalogBackend};
use fashionary_storefront::page::try_on::{TryOnFailure, build_request};
use thiserror::Error;

/// Errors that can occur while generating a try-on image.
#[derive(Debug, Error)]
pub enum TryOnError {
    /// Fetching a display record failed.
    #[error("Backend request failed: {0}")]
    Backend(#[from] BackendError),

    /// The request could not be built or was rejected.
    #[error("{}", .0.message)]
    Failed(TryOnFailure),

    /// The generated image was not a base64 data URL.
    #[error("Generated image is unreadable: {0}")]
    Image(#[from] DataUrlError),

    /// Writing the image failed.
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Generate a try-on image for a user and a product and save it to `output`.
pub async fn generate<B: CatalogBackend>(
    backend: &B,
    user_id: &str,
    product_id: &str,
    output: &Path,
) -> Result<(), TryOnError> {
    let user_id_key = UserId::new(user_id);
    let product_id_key = ProductId::new(product_id);
    let (user, product) = tokio::join!(
        backend.user_display(&user_id_key),
        backend.product_display(&product_id_key),
    );
    let (user, product) = (user?, product?);

    let request = build_request(Some(&user), Some(&product)).map_err(TryOnError::Failed)?;

    tracing::info!(user_id, product_id, "Requesting try-on generation");
    let response = backend
        .generate_try_on(&request)
        .await
        .map_err(|e| TryOnError::Failed(TryOnFailure::from_backend(&e)))?;

    let image = DataUrl::parse(&response.image_src())?;
    let bytes = write_image(&image, output)?;

    tracing::info!(
        path = %output.display(),
        bytes,
        mime_type = image.mime_type(),
        "Try-on image saved"
    );
    if output.extension().is_none() {
        tracing::warn!(
            "Output has no extension; the image is {} (.{})",
            image.mime_type(),
            image.file_extension()
        );
    }
    Ok(())
}

/// Decode `image` and write the raw bytes to `path`, returning the byte count.
fn write_image(image: &DataUrl, path: &Path) -> Result<usize, TryOnError> {
    let bytes = image.decode_bytes()?;
    std::fs::write(path, &bytes).map_err(|source| TryOnError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes.len())
}
