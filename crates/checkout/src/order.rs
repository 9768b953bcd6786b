//! Order placement flow.
//!
//! Non-card methods place in a single async call. Card payments are gated on
//! a payment-scoped phone verification: the same placement call only fires
//! once that machine reaches `Verified`. Service failures surface as a
//! banner-level message; the in-flight flag is reset on every path.

use shamsi_clients::{OrderClient, OrderDraft, OrderLine, PaymentMethod, PlacedOrder};
use shamsi_core::Message;
use shamsi_otp::PhoneVerification;

use crate::cart::Cart;

/// Checkout orchestration for one order attempt.
pub struct CheckoutFlow<'a> {
    orders: &'a dyn OrderClient,
    /// Verification instance scoped to this payment, independent of the
    /// registration one.
    verification: PhoneVerification,
    placing: bool,
    banner: Option<Message>,
    placed: Option<PlacedOrder>,
}

impl<'a> CheckoutFlow<'a> {
    pub fn new(orders: &'a dyn OrderClient) -> Self {
        Self {
            orders,
            verification: PhoneVerification::new(),
            placing: false,
            banner: None,
            placed: None,
        }
    }

    pub fn verification(&self) -> &PhoneVerification {
        &self.verification
    }

    /// Mutable access for the OTP flow driver (card confirmation).
    pub fn verification_mut(&mut self) -> &mut PhoneVerification {
        &mut self.verification
    }

    pub fn is_placing(&self) -> bool {
        self.placing
    }

    pub fn banner(&self) -> Option<&Message> {
        self.banner.as_ref()
    }

    pub fn placed_order(&self) -> Option<&PlacedOrder> {
        self.placed.as_ref()
    }

    /// Attempt to place the order. Returns whether it went through; failures
    /// leave the reason in [`CheckoutFlow::banner`].
    pub async fn place(&mut self, cart: &Cart, method: PaymentMethod) -> bool {
        if self.placing {
            return false;
        }
        if cart.is_empty() {
            self.banner = Some(Message::new("Your cart is empty", "سلة التسوق فارغة"));
            return false;
        }
        if method.requires_otp() && !self.verification.is_verified() {
            self.banner = Some(Message::new(
                "Confirm the payment with the code sent to your phone",
                "يرجى تأكيد الدفع بالرمز المرسل إلى جوالك",
            ));
            return false;
        }

        let draft = match build_draft(cart, method) {
            Ok(draft) => draft,
            Err(_) => {
                self.banner = Some(Message::generic_failure());
                return false;
            }
        };

        self.placing = true;
        match self.orders.place_order(draft).await {
            Ok(placed) => {
                tracing::info!(order_id = %placed.order_id, method = ?method, "order placed");
                self.banner = None;
                self.placed = Some(placed);
                self.placing = false;
                true
            }
            Err(err) => {
                tracing::warn!(code = ?err.code, method = ?method, "order placement failed");
                self.banner = Some(err.message);
                self.placing = false;
                false
            }
        }
    }
}

fn build_draft(cart: &Cart, method: PaymentMethod) -> shamsi_core::DomainResult<OrderDraft> {
    let totals = cart.totals()?;
    let mut lines = Vec::with_capacity(cart.items().len());
    for item in cart.items() {
        lines.push(OrderLine {
            product_id: item.product.id,
            quantity: item.quantity(),
            unit_price: item.product.unit_price()?,
        });
    }
    Ok(OrderDraft {
        lines,
        payment_method: method,
        subtotal: totals.subtotal,
        vat: totals.vat,
        shipping: totals.shipping,
        total: totals.total,
    })
}
