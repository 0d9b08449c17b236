//! HTTP implementation of the storefront API.

use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use solarstore::{
    dealers::{DealerRecord, DocumentKind, UploadFile},
    products::{Product, ProductId},
    quotation::{Quotation, QuotationRequest},
};

use crate::api::{ApiError, Credentials, LoginResponse, QuotationReceipt, StorefrontApi};

/// `reqwest` client for the storefront backend.
///
/// Requests are sent once; there are no retries and no timeouts beyond the
/// client defaults.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    base_url: String,
    token: Option<String>,
    http: Client,
}

impl HttpStorefrontApi {
    /// Create a client for the API at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorised(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            warn!(%status, "storefront API request failed");

            return Err(ApiError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        Ok(self.send(request).await?.json().await?)
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.fetch(self.http.post(self.url("auth/login")).json(credentials))
            .await
    }

    async fn get_product(&self, product: ProductId) -> Result<Product, ApiError> {
        self.fetch(self.http.get(self.url(&format!("products/{product}"))))
            .await
    }

    async fn submit_quotation(
        &self,
        request: &QuotationRequest,
    ) -> Result<QuotationReceipt, ApiError> {
        debug!(products = request.products.len(), "submitting quotation");

        let response = self
            .send(self.http.post(self.url("quotations")).json(request))
            .await?;

        // Some deployments answer with an empty body.
        let body = response.text().await?;

        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    async fn list_quotations(&self) -> Result<Vec<Quotation>, ApiError> {
        self.fetch(self.http.get(self.url("quotations"))).await
    }

    async fn get_dealer(&self, dealer: u64) -> Result<DealerRecord, ApiError> {
        self.fetch(self.http.get(self.url(&format!("dealers/{dealer}"))))
            .await
    }

    async fn update_dealer_status(&self, dealer: u64, code: u8) -> Result<(), ApiError> {
        self.send(
            self.http
                .put(self.url(&format!("dealers/update-status/{dealer}")))
                .json(&json!({ "reg_status": code })),
        )
        .await?;

        Ok(())
    }

    async fn upload_dealer_documents(
        &self,
        dealer: u64,
        kind: DocumentKind,
        files: Vec<UploadFile>,
    ) -> Result<DealerRecord, ApiError> {
        let form = files.into_iter().fold(Form::new(), |form, file| {
            form.part(
                kind.field_name(),
                Part::bytes(file.bytes).file_name(file.file_name),
            )
        });

        self.fetch(
            self.http
                .put(self.url(&format!("dealers/{dealer}/documents")))
                .multipart(form),
        )
        .await
    }
}
