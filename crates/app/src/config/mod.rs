//! Client configuration module

use clap::Args;

use crate::config::{
    api::ApiConfig, messaging::MessagingConfig, observability::LoggingConfig,
    storage::StorageConfig,
};

pub mod api;
pub mod messaging;
pub mod observability;
pub mod storage;

pub use observability::LogFormat;

/// Solarstore client configuration, shared by every subcommand.
#[derive(Debug, Args)]
pub struct ClientConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Messaging checkout settings.
    #[command(flatten)]
    pub messaging: MessagingConfig,

    /// Durable client storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

/// Load `.env` into the process environment, if present.
pub fn load_dotenv() {
    // Missing .env is fine
    _ = dotenvy::dotenv();
}
