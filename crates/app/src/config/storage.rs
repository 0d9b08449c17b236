//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Durable client storage settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// File holding the persisted session and cart
    #[arg(long, env = "STORE_PATH", default_value = ".solarstore/store.json", global = true)]
    pub store_path: PathBuf,
}
