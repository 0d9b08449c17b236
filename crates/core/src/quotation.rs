//! Quotation requests

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{
    cart::AggregateLine,
    products::{Product, ProductId},
    session::Session,
};

/// Message shown when a quotation could not be submitted.
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to submit quotation request. Please try again.";

/// Message shown when a quotation was accepted by the server.
pub const SUBMIT_SUCCEEDED_MESSAGE: &str =
    "Quotation request submitted. We will get back to you shortly.";

/// Review status of a quotation, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotationStatus {
    /// Awaiting review
    Pending,

    /// Accepted by an admin
    Approved,

    /// Declined by an admin
    Rejected,

    /// A status this client does not know, shown verbatim
    Other(String),
}

impl QuotationStatus {
    /// The status as the server spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            QuotationStatus::Pending => "Pending",
            QuotationStatus::Approved => "Approved",
            QuotationStatus::Rejected => "Rejected",
            QuotationStatus::Other(other) => other,
        }
    }
}

impl From<String> for QuotationStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => QuotationStatus::Pending,
            "Approved" => QuotationStatus::Approved,
            "Rejected" => QuotationStatus::Rejected,
            _ => QuotationStatus::Other(value),
        }
    }
}

impl Display for QuotationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl Serialize for QuotationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QuotationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(QuotationStatus::from)
    }
}

/// Who is asking for the quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequesterIdentity {
    /// Full name
    pub name: String,

    /// Postal address
    pub address: String,

    /// Email address
    pub email: String,

    /// Phone number
    pub phone: String,
}

/// Editable quote form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteForm {
    /// Requester details
    pub identity: RequesterIdentity,

    /// Free-text notes
    pub notes: String,

    /// Quantity as typed
    pub quantity: String,
}

impl Default for QuoteForm {
    fn default() -> Self {
        Self {
            identity: RequesterIdentity::default(),
            notes: String::new(),
            quantity: "1".to_string(),
        }
    }
}

/// Reasons a quote form is rejected before submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteValidationError {
    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The quantity is not a positive integer.
    #[error("quantity must be a positive whole number, got {0:?}")]
    InvalidQuantity(String),
}

impl QuoteForm {
    /// A form pre-filled from the session user, or blank without a session.
    #[must_use]
    pub fn prefilled(session: Option<&Session>) -> Self {
        let identity = session
            .map(|session| RequesterIdentity {
                name: session.user.full_name.clone(),
                address: session.user.address.clone(),
                email: session.user.email.clone(),
                phone: session.user.phone.clone(),
            })
            .unwrap_or_default();

        Self {
            identity,
            ..Self::default()
        }
    }

    /// Check required fields and parse the quantity.
    ///
    /// # Errors
    ///
    /// Returns a `QuoteValidationError` for the first failing field.
    pub fn validate(&self) -> Result<u32, QuoteValidationError> {
        let required = [
            ("name", &self.identity.name),
            ("address", &self.identity.address),
            ("email", &self.identity.email),
            ("phone", &self.identity.phone),
        ];

        if let Some(&(field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(QuoteValidationError::MissingField(field));
        }

        match self.quantity.trim().parse::<u32>() {
            Ok(quantity) if quantity >= 1 => Ok(quantity),
            _ => Err(QuoteValidationError::InvalidQuantity(self.quantity.clone())),
        }
    }

    /// Reset the form after a successful submission.
    ///
    /// Every editable field goes back to blank, identity included, even when
    /// it was pre-filled from the session.
    pub fn reset_after_submit(&mut self) {
        *self = Self::default();
    }
}

/// Product line on a quotation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationProduct {
    /// Product identifier
    pub product_id: ProductId,

    /// Requested quantity, at least one
    pub quantity: u32,

    /// Product name
    pub name: String,
}

/// Body posted to the quotation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotationRequest {
    /// Session user id, `null` for anonymous requests
    #[serde(rename = "userId")]
    pub user_id: Option<u64>,

    /// Requester name
    pub customer_name: String,

    /// Requester address
    pub customer_address: String,

    /// Requester email
    pub customer_email: String,

    /// Requester phone
    pub customer_phone: String,

    /// Free-text notes
    pub notes: String,

    /// Requested products
    pub products: Vec<QuotationProduct>,
}

impl QuotationRequest {
    /// Build a request for a single product from a quote form.
    ///
    /// # Errors
    ///
    /// Returns a `QuoteValidationError` if the form is incomplete.
    pub fn for_product(
        product: &Product,
        form: &QuoteForm,
        session: Option<&Session>,
    ) -> Result<Self, QuoteValidationError> {
        let quantity = form.validate()?;

        Ok(Self::new(
            form,
            session,
            vec![QuotationProduct {
                product_id: product.product_id,
                quantity,
                name: product.product_name.clone(),
            }],
        ))
    }

    /// Build a request covering a whole cart.
    ///
    /// The form quantity is not used; each line carries its cart quantity.
    ///
    /// # Errors
    ///
    /// Returns a `QuoteValidationError` if the identity is incomplete.
    pub fn for_cart(
        lines: &[AggregateLine],
        form: &QuoteForm,
        session: Option<&Session>,
    ) -> Result<Self, QuoteValidationError> {
        let form = QuoteForm {
            quantity: "1".to_string(),
            ..form.clone()
        };

        form.validate()?;

        let products = lines
            .iter()
            .map(|line| QuotationProduct {
                product_id: line.product_id,
                quantity: line.quantity,
                name: line.product_name.clone(),
            })
            .collect();

        Ok(Self::new(&form, session, products))
    }

    fn new(form: &QuoteForm, session: Option<&Session>, products: Vec<QuotationProduct>) -> Self {
        Self {
            user_id: session.map(|session| session.user.id),
            customer_name: form.identity.name.trim().to_string(),
            customer_address: form.identity.address.trim().to_string(),
            customer_email: form.identity.email.trim().to_string(),
            customer_phone: form.identity.phone.trim().to_string(),
            notes: form.notes.clone(),
            products,
        }
    }
}

/// Quotation record as listed by the back-office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quotation {
    /// Quotation id
    pub id: u64,

    /// Requester name
    pub customer_name: String,

    /// Requester email
    #[serde(default)]
    pub customer_email: String,

    /// Requester phone
    #[serde(default)]
    pub customer_phone: String,

    /// Free-text notes
    #[serde(default)]
    pub notes: Option<String>,

    /// Server-side status
    pub status: QuotationStatus,

    /// Requested products
    #[serde(default)]
    pub products: Vec<QuotationProduct>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::session::{Role, SessionUser};

    use super::*;

    fn session() -> Session {
        Session::new(
            SessionUser {
                id: 42,
                full_name: "Thandi Moyo".to_string(),
                email: "thandi@example.com".to_string(),
                phone: "0770000000".to_string(),
                address: "1 Solar Way".to_string(),
                role: Role::Customer,
            },
            None,
        )
    }

    fn filled_form() -> QuoteForm {
        QuoteForm {
            quantity: "3".to_string(),
            notes: "Roof mount".to_string(),
            ..QuoteForm::prefilled(Some(&session()))
        }
    }

    #[test]
    fn prefilled_form_copies_session_identity() {
        let form = QuoteForm::prefilled(Some(&session()));

        assert_eq!(form.identity.name, "Thandi Moyo");
        assert_eq!(form.identity.address, "1 Solar Way");
        assert_eq!(form.quantity, "1");
    }

    #[test]
    fn anonymous_form_is_blank() {
        assert_eq!(QuoteForm::prefilled(None), QuoteForm::default());
    }

    #[test]
    fn missing_identity_field_is_rejected() {
        let mut form = filled_form();
        form.identity.phone = "  ".to_string();

        assert_eq!(form.validate(), Err(QuoteValidationError::MissingField("phone")));
    }

    #[test]
    fn quantity_must_be_positive_integer() {
        for bad in ["0", "-2", "1.5", "", "ten"] {
            let form = QuoteForm {
                quantity: bad.to_string(),
                ..filled_form()
            };

            assert_eq!(
                form.validate(),
                Err(QuoteValidationError::InvalidQuantity(bad.to_string())),
                "quantity {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn product_request_has_wire_shape() -> TestResult {
        let product = Product::new(7, "Panel X", "a.jpg");

        let request = QuotationRequest::for_product(&product, &filled_form(), Some(&session()))?;

        assert_eq!(
            serde_json::to_value(&request)?,
            json!({
                "userId": 42,
                "customer_name": "Thandi Moyo",
                "customer_address": "1 Solar Way",
                "customer_email": "thandi@example.com",
                "customer_phone": "0770000000",
                "notes": "Roof mount",
                "products": [{ "product_id": 7, "quantity": 3, "name": "Panel X" }]
            })
        );

        Ok(())
    }

    #[test]
    fn anonymous_request_has_null_user() -> TestResult {
        let form = QuoteForm {
            identity: RequesterIdentity {
                name: "Guest".to_string(),
                address: "Somewhere".to_string(),
                email: "guest@example.com".to_string(),
                phone: "123".to_string(),
            },
            ..QuoteForm::default()
        };

        let request = QuotationRequest::for_product(&Product::new(1, "Panel", ""), &form, None)?;

        assert_eq!(request.user_id, None);
        assert_eq!(serde_json::to_value(&request)?["userId"], json!(null));

        Ok(())
    }

    #[test]
    fn cart_request_uses_line_quantities() -> TestResult {
        let lines = [
            AggregateLine {
                product_id: ProductId(7),
                product_name: "Panel X".to_string(),
                image: String::new(),
                quantity: 4,
            },
            AggregateLine {
                product_id: ProductId(9),
                product_name: "Inverter".to_string(),
                image: String::new(),
                quantity: 1,
            },
        ];
        let form = QuoteForm {
            quantity: "not used".to_string(),
            ..filled_form()
        };

        let request = QuotationRequest::for_cart(&lines, &form, Some(&session()))?;

        let quantities: Vec<(u64, u32)> = request
            .products
            .iter()
            .map(|p| (p.product_id.0, p.quantity))
            .collect();

        assert_eq!(quantities, vec![(7, 4), (9, 1)]);

        Ok(())
    }

    #[test]
    fn reset_after_submit_blanks_identity() {
        let mut form = filled_form();

        form.reset_after_submit();

        assert_eq!(form, QuoteForm::default());
        assert!(form.identity.name.is_empty());
    }

    #[test]
    fn status_is_rendered_as_is() -> TestResult {
        let known: QuotationStatus = serde_json::from_value(json!("Approved"))?;
        let unknown: QuotationStatus = serde_json::from_value(json!("On Hold"))?;

        assert_eq!(known, QuotationStatus::Approved);
        assert_eq!(unknown.to_string(), "On Hold");
        assert_eq!(serde_json::to_value(&unknown)?, json!("On Hold"));

        Ok(())
    }
}
