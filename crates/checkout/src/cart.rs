//! Cart model and derived totals.
//!
//! The cart holds products with quantities; every total is recomputed on
//! demand from the lines, nothing is cached. Quantities are always at least
//! one, a quantity dropped to zero removes the line.

use serde::{Deserialize, Serialize};
use shamsi_clients::Product;
use shamsi_core::{DomainError, DomainResult, Money, ProductId};

/// VAT rate applied to the subtotal, in percent.
pub const VAT_RATE_PERCENT: u64 = 15;

/// Orders strictly above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD_SAR: u64 = 500;

/// Flat shipping fee below the threshold.
pub const SHIPPING_FEE_SAR: u64 = 50;

/// One product with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    quantity: u32,
}

impl CartItem {
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn line_total(&self) -> DomainResult<Money> {
        self.product.unit_price()?.mul_qty(self.quantity)
    }
}

/// Totals derived from the cart lines.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Money,
    pub vat: Money,
    pub shipping: Money,
    pub total: Money,
}

impl Totals {
    pub const ZERO: Totals = Totals {
        subtotal: Money::ZERO,
        vat: Money::ZERO,
        shipping: Money::ZERO,
        total: Money::ZERO,
    };
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add `quantity` of a product, merging into an existing line.
    ///
    /// Out-of-stock products and zero quantities are rejected.
    pub fn add(&mut self, product: Product, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if !product.is_orderable() {
            return Err(DomainError::conflict(format!(
                "product {} is out of stock",
                product.id
            )));
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product.id) {
            item.quantity = item.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem { product, quantity });
        }
        Ok(())
    }

    /// Set a line's quantity. Zero removes the line.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(item) = self.items.iter_mut().find(|i| i.product.id == product_id) {
            item.quantity = quantity;
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product.id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Recompute every total from the current lines.
    ///
    /// subtotal = Σ(unit price × quantity); vat = 15% of subtotal, truncating;
    /// shipping is waived strictly above 500 SAR; total is the sum of all
    /// three. An empty cart is all zeros, with no shipping fee.
    pub fn totals(&self) -> DomainResult<Totals> {
        if self.items.is_empty() {
            return Ok(Totals::ZERO);
        }

        let mut subtotal = Money::ZERO;
        for item in &self.items {
            subtotal = subtotal.checked_add(item.line_total()?)?;
        }

        let vat = subtotal.percent(VAT_RATE_PERCENT)?;
        let shipping = if subtotal > Money::from_sar(FREE_SHIPPING_THRESHOLD_SAR)? {
            Money::ZERO
        } else {
            Money::from_sar(SHIPPING_FEE_SAR)?
        };
        let total = subtotal.checked_add(vat)?.checked_add(shipping)?;

        Ok(Totals {
            subtotal,
            vat,
            shipping,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shamsi_clients::StockStatus;
    use std::collections::BTreeMap;

    fn product(price: &str) -> Product {
        Product {
            id: ProductId::new(),
            name: "450W Mono Panel".to_string(),
            brand: "SunVolt".to_string(),
            price: price.to_string(),
            images: vec![],
            specifications: BTreeMap::new(),
            stock: StockStatus::InStock,
            vat_inclusive: false,
        }
    }

    #[test]
    fn totals_above_free_shipping_threshold() {
        let mut cart = Cart::new();
        cart.add(product("600"), 1).unwrap();

        let totals = cart.totals().unwrap();
        assert_eq!(totals.subtotal, Money::from_sar(600).unwrap());
        assert_eq!(totals.vat, Money::from_sar(90).unwrap());
        assert_eq!(totals.shipping, Money::ZERO);
        assert_eq!(totals.total, Money::from_sar(690).unwrap());
    }

    #[test]
    fn totals_below_threshold_pay_shipping() {
        let mut cart = Cart::new();
        cart.add(product("300"), 1).unwrap();

        let totals = cart.totals().unwrap();
        assert_eq!(totals.vat, Money::from_sar(45).unwrap());
        assert_eq!(totals.shipping, Money::from_sar(50).unwrap());
        assert_eq!(totals.total, Money::from_sar(395).unwrap());
    }

    #[test]
    fn threshold_is_strict() {
        let mut cart = Cart::new();
        cart.add(product("500"), 1).unwrap();
        assert_eq!(
            cart.totals().unwrap().shipping,
            Money::from_sar(50).unwrap()
        );

        cart.add(product("0.01"), 1).unwrap();
        assert_eq!(cart.totals().unwrap().shipping, Money::ZERO);
    }

    #[test]
    fn empty_cart_is_all_zeros() {
        assert_eq!(Cart::new().totals().unwrap(), Totals::ZERO);
    }

    #[test]
    fn adding_the_same_product_merges_lines() {
        let mut cart = Cart::new();
        let p = product("100");
        let id = p.id;
        cart.add(p.clone(), 1).unwrap();
        cart.add(p, 2).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity(), 3);
        assert_eq!(
            cart.totals().unwrap().subtotal,
            Money::from_sar(300).unwrap()
        );

        cart.set_quantity(id, 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn out_of_stock_and_zero_quantity_are_rejected() {
        let mut cart = Cart::new();
        let mut p = product("100");
        assert!(cart.add(p.clone(), 0).is_err());
        p.stock = StockStatus::OutOfStock;
        assert!(cart.add(p, 1).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn unparsable_price_surfaces_as_amount_error() {
        let mut cart = Cart::new();
        cart.add(product("n/a"), 1).unwrap();
        assert!(cart.totals().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 1000, ..ProptestConfig::default() })]

        /// total = subtotal + vat + shipping, whatever the amounts.
        #[test]
        fn totals_always_reconcile(sar in 1u64..100_000, qty in 1u32..20) {
            let mut cart = Cart::new();
            cart.add(product(&sar.to_string()), qty).unwrap();
            let totals = cart.totals().unwrap();
            prop_assert_eq!(
                totals.total,
                totals
                    .subtotal
                    .checked_add(totals.vat)
                    .unwrap()
                    .checked_add(totals.shipping)
                    .unwrap()
            );
            prop_assert!(totals.vat <= totals.subtotal);
        }
    }
}
