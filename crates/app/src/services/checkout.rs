//! Checkout service.

use jiff::Timestamp;
use tracing::info;

use solarstore::{
    cart::{CartEngine, CartView},
    checkout::{CheckoutDecision, MessagingTarget, decide},
    session::Session,
    storage::ClientStore,
};

use crate::services::ServiceError;

/// Checkout decision together with the cart it was made for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutOutcome {
    /// Where checkout goes next
    pub decision: CheckoutDecision,

    /// Cart at the time of the decision
    pub cart: CartView,
}

/// Decide how the persisted cart is checked out for the persisted session.
///
/// # Errors
///
/// Returns a `ServiceError` if the session or cart cannot be read.
pub fn checkout<S: ClientStore>(
    store: &mut S,
    target: &MessagingTarget,
    now: Timestamp,
) -> Result<CheckoutOutcome, ServiceError> {
    let session = Session::load(&*store)?;
    let cart = CartEngine::new(&mut *store).view(now)?;

    let decision = decide(session.as_ref(), &cart, target);

    info!(
        lines = cart.aggregate.len(),
        dealer = matches!(decision, CheckoutDecision::InternalCheckout),
        "checkout requested"
    );

    Ok(CheckoutOutcome { decision, cart })
}
