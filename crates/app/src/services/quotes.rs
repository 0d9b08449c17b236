//! Quotation service.

use std::sync::Arc;

use jiff::Timestamp;
use tracing::{error, info};

use solarstore::{
    cart::CartEngine,
    products::Product,
    quotation::{
        QuotationRequest, QuoteForm, QuoteValidationError, SUBMIT_FAILED_MESSAGE,
        SUBMIT_SUCCEEDED_MESSAGE,
    },
    session::{Capability, Session, allows},
    storage::ClientStore,
};

use crate::{
    api::{QuotationReceipt, StorefrontApi},
    services::ServiceError,
};

/// What happened to a quotation submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteOutcome {
    /// The server accepted the request and the form was reset.
    Submitted {
        /// Server acknowledgement
        receipt: QuotationReceipt,

        /// Confirmation to show
        message: &'static str,
    },

    /// The form was rejected before anything was sent.
    Invalid(QuoteValidationError),

    /// The cart had nothing to quote; nothing was sent.
    EmptyCart,

    /// The server call failed; the form is kept for another try.
    Failed {
        /// Retry prompt to show
        message: &'static str,
    },
}

/// Submits quotation requests.
#[derive(Clone)]
pub struct QuoteService {
    api: Arc<dyn StorefrontApi>,
}

impl std::fmt::Debug for QuoteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteService").finish_non_exhaustive()
    }
}

impl QuoteService {
    /// Create a service over `api`.
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self { api }
    }

    /// Request a quote for a single product.
    ///
    /// On success the form is reset; on failure it is left as it was. Nothing
    /// is retried.
    pub async fn request_quote(
        &self,
        product: &Product,
        form: &mut QuoteForm,
        session: Option<&Session>,
    ) -> QuoteOutcome {
        let request = match QuotationRequest::for_product(product, form, session) {
            Ok(request) => request,
            Err(invalid) => return QuoteOutcome::Invalid(invalid),
        };

        self.submit(&request, form).await
    }

    /// Request a quote for everything in the cart, then clear the cart.
    ///
    /// Only sessions allowed to check out internally may do this. An empty or
    /// expired cart is reported as `EmptyCart` without calling the API.
    ///
    /// # Errors
    ///
    /// Returns a `ServiceError` if the session lacks the capability or the
    /// cart cannot be read or cleared.
    pub async fn request_cart_quote<S: ClientStore>(
        &self,
        store: &mut S,
        form: &mut QuoteForm,
        session: &Session,
        now: Timestamp,
    ) -> Result<QuoteOutcome, ServiceError> {
        if !allows(Some(session), Capability::InternalCheckout) {
            return Err(ServiceError::Forbidden(Capability::InternalCheckout));
        }

        let mut cart = CartEngine::new(store);
        let view = cart.view(now)?;

        if view.aggregate.is_empty() {
            return Ok(QuoteOutcome::EmptyCart);
        }

        let request = match QuotationRequest::for_cart(&view.aggregate, form, Some(session)) {
            Ok(request) => request,
            Err(invalid) => return Ok(QuoteOutcome::Invalid(invalid)),
        };

        let outcome = self.submit(&request, form).await;

        if matches!(outcome, QuoteOutcome::Submitted { .. }) {
            cart.clear()?;
        }

        Ok(outcome)
    }

    async fn submit(&self, request: &QuotationRequest, form: &mut QuoteForm) -> QuoteOutcome {
        match self.api.submit_quotation(request).await {
            Ok(receipt) => {
                info!(quotation = ?receipt.id, products = request.products.len(), "quotation submitted");

                form.reset_after_submit();

                QuoteOutcome::Submitted {
                    receipt,
                    message: SUBMIT_SUCCEEDED_MESSAGE,
                }
            }
            Err(err) => {
                error!(error = %err, "quotation submission failed");

                QuoteOutcome::Failed {
                    message: SUBMIT_FAILED_MESSAGE,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use solarstore::{
        products::ProductId,
        session::{Role, SessionUser},
        storage::{MemoryStore, StorageKey},
    };

    use crate::api::{ApiError, MockStorefrontApi};

    use super::*;

    fn session(role: Role) -> Session {
        Session::new(
            SessionUser {
                id: 42,
                full_name: "Thandi Moyo".to_string(),
                email: "thandi@example.com".to_string(),
                phone: "0770000000".to_string(),
                address: "1 Solar Way".to_string(),
                role,
            },
            Some("tok".to_string()),
        )
    }

    fn now() -> TestResult<Timestamp> {
        Ok(Timestamp::from_second(1_717_200_000)?)
    }

    fn strict_mock() -> MockStorefrontApi {
        let mut api = MockStorefrontApi::new();

        api.expect_login().never();
        api.expect_get_product().never();
        api.expect_list_quotations().never();
        api.expect_get_dealer().never();
        api.expect_update_dealer_status().never();
        api.expect_upload_dealer_documents().never();

        api
    }

    #[tokio::test]
    async fn successful_quote_resets_form() {
        let mut api = strict_mock();

        api.expect_submit_quotation()
            .once()
            .withf(|request| {
                request.user_id == Some(42)
                    && request.products.len() == 1
                    && request.products.first().map(|p| (p.product_id, p.quantity))
                        == Some((ProductId(7), 2))
            })
            .return_once(|_| {
                Ok(QuotationReceipt {
                    id: Some(100),
                    message: None,
                })
            });

        let service = QuoteService::new(Arc::new(api));
        let session = session(Role::Customer);
        let mut form = QuoteForm {
            quantity: "2".to_string(),
            ..QuoteForm::prefilled(Some(&session))
        };

        let outcome = service
            .request_quote(&Product::new(7, "Panel X", ""), &mut form, Some(&session))
            .await;

        assert!(
            matches!(&outcome, QuoteOutcome::Submitted { receipt, .. } if receipt.id == Some(100)),
            "expected Submitted, got {outcome:?}"
        );
        assert_eq!(form, QuoteForm::default());
    }

    #[tokio::test]
    async fn failed_quote_keeps_form_and_reports_retry() {
        let mut api = strict_mock();

        api.expect_submit_quotation()
            .once()
            .return_once(|_| {
                Err(ApiError::UnexpectedResponse {
                    status: 500,
                    body: "boom".to_string(),
                })
            });

        let service = QuoteService::new(Arc::new(api));
        let session = session(Role::Customer);
        let mut form = QuoteForm::prefilled(Some(&session));
        let before = form.clone();

        let outcome = service
            .request_quote(&Product::new(7, "Panel X", ""), &mut form, Some(&session))
            .await;

        assert_eq!(
            outcome,
            QuoteOutcome::Failed {
                message: SUBMIT_FAILED_MESSAGE
            }
        );
        assert_eq!(form, before);
    }

    #[tokio::test]
    async fn invalid_form_is_not_submitted() {
        let mut api = strict_mock();
        api.expect_submit_quotation().never();

        let service = QuoteService::new(Arc::new(api));
        let mut form = QuoteForm::default();

        let outcome = service
            .request_quote(&Product::new(7, "Panel X", ""), &mut form, None)
            .await;

        assert_eq!(
            outcome,
            QuoteOutcome::Invalid(QuoteValidationError::MissingField("name"))
        );
    }

    #[tokio::test]
    async fn double_submit_sends_twice() {
        let mut api = strict_mock();

        api.expect_submit_quotation()
            .times(2)
            .returning(|_| Ok(QuotationReceipt::default()));

        let service = QuoteService::new(Arc::new(api));
        let session = session(Role::Customer);
        let product = Product::new(7, "Panel X", "");

        let mut first = QuoteForm::prefilled(Some(&session));
        let mut second = first.clone();

        let a = service.request_quote(&product, &mut first, Some(&session)).await;
        let b = service.request_quote(&product, &mut second, Some(&session)).await;

        assert!(matches!(a, QuoteOutcome::Submitted { .. }), "got {a:?}");
        assert!(matches!(b, QuoteOutcome::Submitted { .. }), "got {b:?}");
    }

    #[tokio::test]
    async fn cart_quote_clears_cart_on_success() -> TestResult {
        let mut api = strict_mock();

        api.expect_submit_quotation()
            .once()
            .withf(|request| request.products.len() == 2)
            .return_once(|_| Ok(QuotationReceipt::default()));

        let service = QuoteService::new(Arc::new(api));
        let session = session(Role::Dealer);
        let mut store = MemoryStore::new();

        {
            let mut cart = CartEngine::new(&mut store);
            cart.add_item(&Product::new(7, "Panel X", ""), now()?)?;
            cart.add_item(&Product::new(8, "Inverter", ""), now()?)?;
        }

        let mut form = QuoteForm::prefilled(Some(&session));

        let outcome = service
            .request_cart_quote(&mut store, &mut form, &session, now()?)
            .await?;

        assert!(matches!(outcome, QuoteOutcome::Submitted { .. }), "got {outcome:?}");
        assert!(!store.contains(StorageKey::Cart));

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_quote_is_not_submitted() -> TestResult {
        let mut api = strict_mock();
        api.expect_submit_quotation().never();

        let service = QuoteService::new(Arc::new(api));
        let session = session(Role::Dealer);
        let mut store = MemoryStore::new();
        let mut form = QuoteForm::prefilled(Some(&session));
        let before = form.clone();

        let outcome = service
            .request_cart_quote(&mut store, &mut form, &session, now()?)
            .await?;

        assert_eq!(outcome, QuoteOutcome::EmptyCart);
        assert_eq!(form, before);

        Ok(())
    }

    #[tokio::test]
    async fn cart_quote_requires_dealer() -> TestResult {
        let mut api = strict_mock();
        api.expect_submit_quotation().never();

        let service = QuoteService::new(Arc::new(api));
        let session = session(Role::Customer);
        let mut store = MemoryStore::new();
        let mut form = QuoteForm::prefilled(Some(&session));

        let result = service
            .request_cart_quote(&mut store, &mut form, &session, now()?)
            .await;

        assert!(
            matches!(result, Err(ServiceError::Forbidden(Capability::InternalCheckout))),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }
}
