//! Solarstore client runtime: durable storage, REST API access and the
//! services the storefront screens call.

pub mod api;
pub mod config;
pub mod context;
pub mod observability;
pub mod render;
pub mod services;
pub mod store;
