//! Cart
//!
//! The cart lives in client storage under the `cart` key as
//! `{"items": [...], "expires": <epoch millis>}`. A cart past its expiry is
//! treated as absent, and the first write after that starts a fresh cart.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{products::ProductId, storage::StorageError};

mod aggregate;
mod engine;

pub use aggregate::{AggregateLine, aggregate};
pub use engine::{CartEngine, QuantityUpdate};

/// How long a cart lives after it is first written.
pub const CART_TTL: SignedDuration = SignedDuration::from_hours(24 * 30);

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Storage backend failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The cart could not be serialised.
    #[error("failed to serialise cart")]
    Serialize(#[source] serde_json::Error),

    /// The expiry timestamp is out of range.
    #[error("cart expiry out of range")]
    Expiry(#[source] jiff::Error),
}

/// A single raw line in the stored cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Product identifier
    pub product_id: ProductId,

    /// Product name at the time it was added
    pub product_name: String,

    /// First product image at the time it was added
    #[serde(default)]
    pub image: String,

    /// Quantity, at least one
    pub quantity: u32,
}

/// Stored cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    /// Raw lines, in insertion order
    pub items: Vec<CartLineItem>,

    /// Absolute expiry
    #[serde(with = "epoch_millis")]
    pub expires: Timestamp,
}

impl CartState {
    /// Create an empty cart expiring [`CART_TTL`] after `now`.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Expiry` if the expiry is out of range.
    pub fn fresh(now: Timestamp) -> Result<Self, CartError> {
        let expires = now.checked_add(CART_TTL).map_err(CartError::Expiry)?;

        Ok(Self {
            items: Vec::new(),
            expires,
        })
    }

    /// Check whether the cart has expired at `now`.
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires
    }
}

/// What the cart screens display.
///
/// `lines` is the editable raw list; `aggregate` groups it by product and
/// feeds order summaries and totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartView {
    /// Raw stored lines
    pub lines: Vec<CartLineItem>,

    /// Lines grouped by product with summed quantities
    pub aggregate: Vec<AggregateLine>,

    /// Expiry of the live cart, `None` when there is no cart
    pub expires: Option<Timestamp>,
}

impl CartView {
    /// Build a view over a live cart.
    #[must_use]
    pub fn of(cart: CartState) -> Self {
        Self {
            aggregate: aggregate(&cart.items),
            lines: cart.items,
            expires: Some(cart.expires),
        }
    }

    /// Check whether the view has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across the cart.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.aggregate
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }
}

mod epoch_millis {
    use jiff::Timestamp;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(super) fn serialize<S: Serializer>(
        timestamp: &Timestamp,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(timestamp.as_millisecond())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Timestamp, D::Error> {
        let millis = i64::deserialize(deserializer)?;

        Timestamp::from_millisecond(millis).map_err(D::Error::custom)
    }
}
