//! Status enums for catalog entities.

use serde::{Deserialize, Serialize};

/// Stock count below which a product is reported as low on stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Product availability as labelled by the backend display endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StockStatus {
    #[default]
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
}

impl StockStatus {
    /// Derive the status from a stock count.
    #[must_use]
    pub const fn from_stock(stock: i64) -> Self {
        if stock <= 0 {
            Self::OutOfStock
        } else if stock < LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    /// Human-readable label, identical to the backend wire value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
        }
    }

    /// Badge variant used when rendering the status.
    #[must_use]
    pub const fn badge(self) -> &'static str {
        match self {
            Self::InStock => "success",
            Self::LowStock => "warning",
            Self::OutOfStock => "destructive",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for StockStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In Stock" => Ok(Self::InStock),
            "Low Stock" => Ok(Self::LowStock),
            "Out of Stock" => Ok(Self::OutOfStock),
            _ => Err(format!("invalid stock status: {s}")),
        }
    }
}
