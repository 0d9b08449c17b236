//! Storefront REST API

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use solarstore::{
    dealers::{DealerRecord, DocumentKind, UploadFile},
    products::{Product, ProductId},
    quotation::{Quotation, QuotationRequest},
    session::SessionUser,
};

mod http;

pub use http::HttpStorefrontApi;

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-2xx response.
    #[error("unexpected response ({status}): {body}")]
    UnexpectedResponse {
        /// HTTP status code
        status: u16,

        /// Response body, as text
        body: String,
    },
}

/// Login credentials.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Account email
    pub email: String,

    /// Account password
    pub password: String,
}

/// Successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Session user
    pub user: SessionUser,

    /// API token
    pub token: String,
}

/// Server acknowledgement of a quotation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuotationReceipt {
    /// Id of the created quotation, when the server reports it
    #[serde(default)]
    pub id: Option<u64>,

    /// Server message
    #[serde(default)]
    pub message: Option<String>,
}

/// Calls the storefront makes against its backend.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;

    /// Fetch a catalog product.
    async fn get_product(&self, product: ProductId) -> Result<Product, ApiError>;

    /// Submit a quotation request.
    async fn submit_quotation(
        &self,
        request: &QuotationRequest,
    ) -> Result<QuotationReceipt, ApiError>;

    /// List quotations for the back-office.
    async fn list_quotations(&self) -> Result<Vec<Quotation>, ApiError>;

    /// Fetch a dealer record.
    async fn get_dealer(&self, dealer: u64) -> Result<DealerRecord, ApiError>;

    /// Move a dealer to the status with the given numeric code.
    async fn update_dealer_status(&self, dealer: u64, code: u8) -> Result<(), ApiError>;

    /// Upload files for one dealer document field.
    async fn upload_dealer_documents(
        &self,
        dealer: u64,
        kind: DocumentKind,
        files: Vec<UploadFile>,
    ) -> Result<DealerRecord, ApiError>;
}
