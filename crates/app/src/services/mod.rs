//! Storefront services

use thiserror::Error;

use solarstore::{
    cart::CartError,
    dealers::{DocumentUploadError, RegStatus, StatusAction},
    session::{Capability, SessionError},
};

use crate::api::ApiError;

pub mod checkout;
pub mod dealers;
pub mod quotes;

pub use checkout::{CheckoutOutcome, checkout};
pub use dealers::{DealerService, RegistrationProgress};
pub use quotes::{QuoteOutcome, QuoteService};

/// Errors raised by storefront services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The session does not grant the capability.
    #[error("not allowed: {0:?}")]
    Forbidden(Capability),

    /// The action is not offered for the dealer's current status.
    #[error("{} is not available for a dealer in status {status}", action.label())]
    ActionUnavailable {
        /// Current dealer status
        status: RegStatus,

        /// Requested action
        action: StatusAction,
    },

    /// The picked documents were rejected.
    #[error(transparent)]
    Upload(#[from] DocumentUploadError),

    /// Cart storage failure.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Session storage failure.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Backend API failure.
    #[error(transparent)]
    Api(#[from] ApiError),
}
