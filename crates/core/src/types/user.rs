//! User ("model") records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ProductId, UserId};
use crate::data_url::{DataUrl, DataUrlError};

/// User summary as returned by `GET /users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub style_preferences: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub purchase_history: Vec<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cart_status: Option<CartStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// User display record as returned by `GET /users/{id}/display`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDisplay {
    #[serde(flatten)]
    pub user: User,
    /// `data:<mime>;base64,<payload>`, rendered as-is in `<img src>`.
    pub image: String,
}

impl UserDisplay {
    /// Parse the embedded image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is not a base64 data URL.
    pub fn image_data_url(&self) -> Result<DataUrl, DataUrlError> {
        DataUrl::parse(&self.image)
    }
}

/// A user's current cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CartStatus {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_price: Decimal,
}

impl CartStatus {
    /// Returns true if the cart holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A single cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}
