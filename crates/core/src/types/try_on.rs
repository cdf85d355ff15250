//! Try-on generation wire types.

use serde::{Deserialize, Serialize};

use crate::data_url::DataUrl;

/// Mime type assumed when the backend omits one.
const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Body of `POST /api/v1/tryon/generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TryOnRequest {
    pub user_image_base64: String,
    pub user_image_mimetype: String,
    pub product_image_base64: String,
    pub product_image_mimetype: String,
}

impl TryOnRequest {
    /// Build a request from the model's and the product's parsed images.
    #[must_use]
    pub fn new(user_image: DataUrl, product_image: DataUrl) -> Self {
        let (user_image_mimetype, user_image_base64) = user_image.into_parts();
        let (product_image_mimetype, product_image_base64) = product_image.into_parts();
        Self {
            user_image_base64,
            user_image_mimetype,
            product_image_base64,
            product_image_mimetype,
        }
    }
}

/// Successful response of the try-on endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TryOnResponse {
    pub generated_image_base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
}

impl TryOnResponse {
    /// The image source to render.
    ///
    /// A response that already carries a data URL is returned verbatim;
    /// a bare payload is wrapped using `mimetype` (JPEG if absent).
    #[must_use]
    pub fn image_src(&self) -> String {
        if self.generated_image_base64.starts_with("data:") {
            return self.generated_image_base64.clone();
        }
        let mime = self.mimetype.as_deref().unwrap_or(DEFAULT_MIME_TYPE);
        DataUrl::new(mime, self.generated_image_base64.as_str()).to_string()
    }
}

/// Error body returned by the backend on non-2xx responses.
///
/// `detail` is usually a string, but validation failures carry a JSON list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiErrorBody {
    /// The detail rendered as text, if present and non-empty.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
