//! API Config

use clap::Args;

/// Backend API settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Base URL of the storefront REST API
    #[arg(
        long,
        env = "API_BASE_URL",
        default_value = "http://localhost:5000/api",
        global = true
    )]
    pub api_base_url: String,

    /// Base URL static assets are served from
    #[arg(
        long,
        env = "ASSET_BASE_URL",
        default_value = "http://localhost:5000",
        global = true
    )]
    pub asset_base_url: String,
}
