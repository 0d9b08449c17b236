//! App Context

use std::sync::Arc;

use solarstore::session::Session;

use crate::{
    api::{HttpStorefrontApi, StorefrontApi},
    config::api::ApiConfig,
    services::{DealerService, QuoteService},
};

/// Services wired to one API client.
#[derive(Clone)]
pub struct AppContext {
    /// Backend client, for calls that need no service logic
    pub api: Arc<dyn StorefrontApi>,

    /// Quotation submissions
    pub quotes: QuoteService,

    /// Dealer registration and verification
    pub dealers: DealerService,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("quotes", &self.quotes)
            .field("dealers", &self.dealers)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build the context over an HTTP client, authenticated as `session` when given.
    #[must_use]
    pub fn from_config(config: &ApiConfig, session: Option<&Session>) -> Self {
        let token = session.and_then(|session| session.token.clone());

        Self::with_api(Arc::new(HttpStorefrontApi::new(
            config.api_base_url.clone(),
            token,
        )))
    }

    /// Build the context over any API implementation.
    #[must_use]
    pub fn with_api(api: Arc<dyn StorefrontApi>) -> Self {
        Self {
            quotes: QuoteService::new(Arc::clone(&api)),
            dealers: DealerService::new(Arc::clone(&api)),
            api,
        }
    }
}
