//! `shamsi-checkout` — cart model, derived totals and order placement.
//!
//! Totals ([`cart::Cart::totals`]) are always derived from the lines, never
//! cached. Placement ([`order::CheckoutFlow`]) is a single async call, with
//! card payments gated on a payment-scoped phone verification.

pub mod cart;
pub mod order;

pub use cart::{
    Cart, CartItem, Totals, FREE_SHIPPING_THRESHOLD_SAR, SHIPPING_FEE_SAR, VAT_RATE_PERCENT,
};
pub use order::CheckoutFlow;
