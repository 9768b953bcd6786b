//! Marketplace (product catalog) service contract.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shamsi_core::{DomainResult, Money, ProductId};

use crate::error::ServiceResult;

/// Stock availability as reported by the marketplace.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

/// A catalog product.
///
/// The service delivers `price` as a decimal string; [`Product::unit_price`]
/// parses it once into [`Money`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    /// Decimal string, e.g. "1299.50".
    pub price: String,
    pub images: Vec<String>,
    /// Specification name/value pairs grouped by category
    /// (e.g. "electrical" -> [("output", "550W"), ...]).
    pub specifications: BTreeMap<String, Vec<(String, String)>>,
    pub stock: StockStatus,
    /// Whether the listed price already includes 15% VAT.
    pub vat_inclusive: bool,
}

impl Product {
    pub fn unit_price(&self) -> DomainResult<Money> {
        Money::parse_sar(&self.price)
    }

    pub fn is_orderable(&self) -> bool {
        self.stock != StockStatus::OutOfStock
    }
}

/// Behavioral contract of the marketplace service.
#[async_trait]
pub trait MarketplaceClient: Send + Sync {
    async fn product_by_id(&self, id: ProductId) -> ServiceResult<Product>;
}
