//! Order service contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shamsi_core::{Money, OrderId, ProductId};

use crate::error::ServiceResult;

/// How the customer pays.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    BnplInstallments,
    CashOnDelivery,
}

impl PaymentMethod {
    /// Card payments confirm through a phone OTP before placement.
    pub fn requires_otp(&self) -> bool {
        matches!(self, PaymentMethod::Card)
    }
}

/// One cart line as submitted to the order service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

/// Order placement payload. Totals are sent as computed client-side; the
/// service recomputes and rejects mismatches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub lines: Vec<OrderLine>,
    pub payment_method: PaymentMethod,
    pub subtotal: Money,
    pub vat: Money,
    pub shipping: Money,
    pub total: Money,
}

/// Acknowledgement of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub order_id: OrderId,
    pub placed_at: DateTime<Utc>,
}

/// Behavioral contract of the order service.
#[async_trait]
pub trait OrderClient: Send + Sync {
    async fn place_order(&self, draft: OrderDraft) -> ServiceResult<PlacedOrder>;
}
