//! `reqwest` implementation of [`CatalogBackend`].

use fashionary_core::{
    ApiErrorBody, Product, ProductDisplay, ProductId, TryOnRequest, TryOnResponse, User,
    UserDisplay, UserId,
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{BackendError, CatalogBackend, SortField, SortOrder};
use crate::config::BackendConfig;

/// HTTP client for the catalog and try-on backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments.
    ///
    /// Segments are percent-encoded, so identifiers cannot escape their slot.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BackendError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, BackendError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        read_json(response).await
    }
}

/// Decode a JSON body, converting non-2xx responses into [`BackendError::Status`].
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    let url = response.url().clone();
    let body = response
        .bytes()
        .await
        .map_err(|e| BackendError::Transport(e.to_string()))?;

    if !status.is_success() {
        let detail = serde_json::from_slice::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message());
        warn!(
            status = status.as_u16(),
            url = %url,
            detail = ?detail,
            "Backend returned an error status"
        );
        return Err(BackendError::Status {
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_slice(&body).map_err(|e| BackendError::Decode(e.to_string()))
}

impl CatalogBackend for BackendClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, BackendError> {
        let products: Vec<Product> = self.get_json(self.endpoint(&["products"])?).await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    #[instrument(skip(self), fields(field = field.as_str(), order = order.as_str()))]
    async fn list_products_sorted(
        &self,
        field: SortField,
        order: SortOrder,
    ) -> Result<Vec<Product>, BackendError> {
        let mut url = self.endpoint(&["products"])?;
        url.query_pairs_mut()
            .append_pair("sort_by", field.as_str())
            .append_pair("order", order.as_str());
        self.get_json(url).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Product, BackendError> {
        self.get_json(self.endpoint(&["products", id.as_str()])?)
            .await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product_display(&self, id: &ProductId) -> Result<ProductDisplay, BackendError> {
        self.get_json(self.endpoint(&["products", id.as_str(), "display"])?)
            .await
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>, BackendError> {
        let users: Vec<User> = self.get_json(self.endpoint(&["users"])?).await?;
        debug!(count = users.len(), "Fetched users");
        Ok(users)
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn user_display(&self, id: &UserId) -> Result<UserDisplay, BackendError> {
        self.get_json(self.endpoint(&["users", id.as_str(), "display"])?)
            .await
    }

    #[instrument(skip(self))]
    async fn all_user_ids(&self) -> Result<Vec<UserId>, BackendError> {
        self.get_json(self.endpoint(&["users", "all_ids"])?).await
    }

    #[instrument(
        skip(self, request),
        fields(
            user_mimetype = %request.user_image_mimetype,
            product_mimetype = %request.product_image_mimetype,
        )
    )]
    async fn generate_try_on(&self, request: &TryOnRequest) -> Result<TryOnResponse, BackendError> {
        let url = self.endpoint(&["api", "v1", "tryon", "generate"])?;
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let generated: TryOnResponse = read_json(response).await?;
        debug!(
            bytes = generated.generated_image_base64.len(),
            "Try-on image generated"
        );
        Ok(generated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> BackendClient {
        BackendClient::new(&BackendConfig::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let client = client("http://localhost:8000");
        let url = client.endpoint(&["products", "abc", "display"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/products/abc/display");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("https://example.com/backend/");
        let url = client.endpoint(&["users", "all_ids"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/backend/users/all_ids");
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let client = client("http://localhost:8000");
        let url = client.endpoint(&["users", "../admin", "display"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/users/..%2Fadmin/display"
        );
    }
}
