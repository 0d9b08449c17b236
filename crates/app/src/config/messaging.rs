//! Messaging Config

use clap::Args;
use solarstore::checkout::MessagingTarget;

/// Messaging checkout settings.
#[derive(Debug, Args)]
pub struct MessagingConfig {
    /// Phone number non-dealer orders are sent to
    #[arg(long, env = "WHATSAPP_NUMBER", default_value = "263770000000", global = true)]
    pub whatsapp_number: String,
}

impl MessagingConfig {
    /// Deep-link target for the configured number.
    #[must_use]
    pub fn target(&self) -> MessagingTarget {
        MessagingTarget::new(&self.whatsapp_number)
    }
}
