//! Solarstore
//!
//! Client-side commerce and onboarding state for the solar storefront: the
//! persisted cart, quotation requests, checkout routing and the dealer
//! registration workflow.

pub mod assets;
pub mod cart;
pub mod checkout;
pub mod dealers;
pub mod pagination;
pub mod products;
pub mod quotation;
pub mod session;
pub mod storage;
