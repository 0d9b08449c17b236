//! Checkout routing
//!
//! Dealers check out through the internal quotation flow. Everybody else is
//! sent to a messaging deep link carrying a plain-text order summary.

use std::fmt::Write as _;

use crate::{
    cart::{AggregateLine, CartView},
    session::{Capability, Session, allows},
};

/// Messaging deep-link host.
pub const WHATSAPP_BASE_URL: &str = "https://wa.me";

/// Phone number orders are sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagingTarget {
    phone_number: String,
}

impl MessagingTarget {
    /// Create a target, keeping only the digits of `phone_number`.
    pub fn new(phone_number: impl AsRef<str>) -> Self {
        Self {
            phone_number: phone_number
                .as_ref()
                .chars()
                .filter(char::is_ascii_digit)
                .collect(),
        }
    }

    /// The digits used in the deep link.
    #[must_use]
    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }
}

/// Where checkout goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutDecision {
    /// There is nothing to check out.
    EmptyCart,

    /// Leave the site for the messaging service with this URL.
    DeepLink(String),

    /// Continue to the internal checkout route.
    InternalCheckout,
}

/// Plain-text order summary, one `"<n>. <name> (Qty: <qty>)"` line per product.
pub fn order_summary(lines: &[AggregateLine]) -> String {
    let mut summary = String::new();

    for (idx, line) in lines.iter().enumerate() {
        if idx > 0 {
            summary.push('\n');
        }

        // Writing into a String cannot fail.
        _ = write!(
            summary,
            "{}. {} (Qty: {})",
            idx + 1,
            line.product_name,
            line.quantity
        );
    }

    summary
}

/// Deep link opening a chat with `target`, prefilled with `text`.
pub fn whatsapp_link(target: &MessagingTarget, text: &str) -> String {
    format!(
        "{WHATSAPP_BASE_URL}/{}?text={}",
        target.phone_number(),
        urlencoding::encode(text)
    )
}

/// Decide how to check out `cart` for `session`.
pub fn decide(
    session: Option<&Session>,
    cart: &CartView,
    target: &MessagingTarget,
) -> CheckoutDecision {
    if cart.aggregate.is_empty() {
        return CheckoutDecision::EmptyCart;
    }

    if allows(session, Capability::InternalCheckout) {
        return CheckoutDecision::InternalCheckout;
    }

    CheckoutDecision::DeepLink(whatsapp_link(target, &order_summary(&cart.aggregate)))
}
