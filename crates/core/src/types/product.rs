//! Product records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ProductId, StockStatus};
use crate::data_url::{DataUrl, DataUrlError};

/// Product summary as returned by `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub image_path: String,
    pub description: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub graphic: String,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub stock: i64,
    pub price: Decimal,
    #[serde(default)]
    pub created_at: String,
}

impl Product {
    /// Availability derived from the stock count.
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }

    /// Price formatted for display (e.g. `$19.99`).
    #[must_use]
    pub fn display_price(&self) -> String {
        format_price(self.price)
    }
}

/// Product display record as returned by `GET /products/{id}/display`.
///
/// Same product as [`Product`] with the image embedded as a data URL and the
/// price and stock status already formatted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDisplay {
    pub id: ProductId,
    /// `data:<mime>;base64,<payload>`, rendered as-is in `<img src>`.
    pub image: String,
    pub description: String,
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub graphic: String,
    #[serde(default)]
    pub variant: String,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub stock_status: String,
}

impl ProductDisplay {
    /// Parse the embedded image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image is not a base64 data URL.
    pub fn image_data_url(&self) -> Result<DataUrl, DataUrlError> {
        DataUrl::parse(&self.image)
    }

    /// Availability, preferring the backend label and falling back to the stock count.
    #[must_use]
    pub fn stock_status(&self) -> StockStatus {
        self.stock_status
            .parse()
            .unwrap_or_else(|_| StockStatus::from_stock(self.stock))
    }

    /// Lowercased product type, used as the category key.
    #[must_use]
    pub fn category(&self) -> String {
        self.product_type.to_lowercase()
    }
}

/// Format a decimal amount as a dollar price with two decimal places.
#[must_use]
pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}
