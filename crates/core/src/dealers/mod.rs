//! Dealers
//!
//! A dealer record is what the dealers endpoint returns. Everything the
//! registration screens show about progress is derived from it on demand.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

pub mod documents;
pub mod sections;
pub mod status;

pub use documents::{DocumentKind, DocumentUploadError, UploadFile, join_file_names, validate_upload};
pub use sections::{DealerSections, RegistrationPanels, Section, derive_sections};
pub use status::{RegStatus, StatusAction, available_actions};

/// One installation a dealer has completed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installation {
    /// What was installed
    #[serde(default)]
    pub system_description: String,

    /// System size, as entered
    #[serde(default)]
    pub size_of_system: String,

    /// Client contact email
    #[serde(default)]
    pub email: String,

    /// Client contact phone
    #[serde(default)]
    pub phone_number: String,
}

/// Dealer record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealerRecord {
    /// Dealer id
    #[serde(default)]
    pub id: u64,

    /// Account holder's full name
    #[serde(default)]
    pub user_full_name: Option<String>,

    /// Account email
    #[serde(default)]
    pub user_email: Option<String>,

    /// Account username
    #[serde(default)]
    pub user_username: Option<String>,

    /// Registered company name
    #[serde(default)]
    pub registered_company: Option<String>,

    /// Trading name
    #[serde(default)]
    pub trading_name: Option<String>,

    /// Company registration number
    #[serde(default)]
    pub company_reg_number: Option<String>,

    /// VAT number
    #[serde(default, rename = "VAT_number")]
    pub vat_number: Option<String>,

    /// Taxpayer identification number
    #[serde(default, rename = "TIN")]
    pub tin: Option<String>,

    /// Tax clearance file name
    #[serde(default)]
    pub tax_clearance: Option<String>,

    /// Certificate of incorporation file name
    #[serde(default)]
    pub certificate_of_incorporation: Option<String>,

    /// Comma-joined file names of the directors' ID copies
    #[serde(default, rename = "national_ID_Copies_of_the_Directors")]
    pub director_id_copies: Option<String>,

    /// Installation history, normalised from a JSON string or array
    #[serde(default, deserialize_with = "deserialize_installations")]
    pub installations: Option<Vec<Installation>>,

    /// Verification stage
    #[serde(default)]
    pub reg_status: RegStatus,
}

impl DealerRecord {
    /// File names of the directors' ID copies.
    pub fn director_id_files(&self) -> Vec<&str> {
        self.director_id_copies
            .as_deref()
            .map(|joined| {
                joined
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Display name for admin listings.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.trading_name
            .as_deref()
            .or(self.registered_company.as_deref())
            .or(self.user_full_name.as_deref())
            .unwrap_or_default()
    }
}

fn deserialize_installations<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<Installation>>, D::Error> {
    Ok(normalize_installations(Value::deserialize(deserializer)?))
}

/// Normalise the installations field, which the backend sends either as a
/// native array or as a JSON-encoded string.
///
/// Unreadable content becomes an empty list.
pub fn normalize_installations(value: Value) -> Option<Vec<Installation>> {
    let parsed = match value {
        Value::Null => return None,
        Value::String(encoded) => serde_json::from_str::<Option<Vec<Installation>>>(&encoded),
        other @ Value::Array(_) => serde_json::from_value::<Vec<Installation>>(other).map(Some),
        other => {
            warn!(kind = value_kind(&other), "unexpected installations value");

            return Some(Vec::new());
        }
    };

    parsed.unwrap_or_else(|error| {
        warn!(%error, "unreadable installations, treating as empty");

        Some(Vec::new())
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    fn installation() -> Value {
        json!({
            "systemDescription": "5kW hybrid",
            "sizeOfSystem": "5kW",
            "email": "client@example.com",
            "phoneNumber": "0771111111"
        })
    }

    #[test]
    fn installations_as_array() -> TestResult {
        let dealer: DealerRecord =
            serde_json::from_value(json!({ "installations": [installation()] }))?;

        let installations = dealer.installations.ok_or("installations missing")?;

        assert_eq!(installations.len(), 1);
        assert_eq!(
            installations.first().map(|i| i.size_of_system.as_str()),
            Some("5kW")
        );

        Ok(())
    }

    #[test]
    fn installations_as_encoded_string() -> TestResult {
        let encoded = serde_json::to_string(&json!([installation(), installation()]))?;

        let dealer: DealerRecord = serde_json::from_value(json!({ "installations": encoded }))?;

        assert_eq!(dealer.installations.map(|i| i.len()), Some(2));

        Ok(())
    }

    #[test]
    fn malformed_installations_fall_back_to_empty() -> TestResult {
        let dealer: DealerRecord =
            serde_json::from_value(json!({ "installations": "[{broken" }))?;

        assert_eq!(dealer.installations, Some(Vec::new()));

        Ok(())
    }

    #[test]
    fn null_or_missing_installations_stay_absent() -> TestResult {
        let explicit: DealerRecord = serde_json::from_value(json!({ "installations": null }))?;
        let encoded: DealerRecord = serde_json::from_value(json!({ "installations": "null" }))?;
        let missing: DealerRecord = serde_json::from_value(json!({}))?;

        assert_eq!(explicit.installations, None);
        assert_eq!(encoded.installations, None);
        assert_eq!(missing.installations, None);

        Ok(())
    }

    #[test]
    fn wire_field_names() -> TestResult {
        let dealer: DealerRecord = serde_json::from_value(json!({
            "id": 3,
            "VAT_number": "VAT-1",
            "TIN": "TIN-1",
            "national_ID_Copies_of_the_Directors": "a.pdf, b.pdf,,c.pdf",
            "reg_status": "Pending_Approval"
        }))?;

        assert_eq!(dealer.vat_number.as_deref(), Some("VAT-1"));
        assert_eq!(dealer.tin.as_deref(), Some("TIN-1"));
        assert_eq!(dealer.director_id_files(), vec!["a.pdf", "b.pdf", "c.pdf"]);
        assert_eq!(dealer.reg_status, RegStatus::PendingApproval);

        Ok(())
    }

    #[test]
    fn null_or_unrecognised_status_still_decodes_record() -> TestResult {
        let null_status: DealerRecord = serde_json::from_value(json!({
            "id": 1,
            "registered_company": "Acme",
            "reg_status": null
        }))?;
        let other_status: DealerRecord = serde_json::from_value(json!({
            "id": 2,
            "registered_company": "Acme",
            "reg_status": "Rejected"
        }))?;

        assert_eq!(null_status.reg_status, RegStatus::PendingDocuments);
        assert_eq!(other_status.reg_status, RegStatus::Unknown("Rejected".to_string()));
        assert_eq!(other_status.registered_company.as_deref(), Some("Acme"));

        Ok(())
    }

    #[test]
    fn display_name_prefers_trading_name() {
        let dealer = DealerRecord {
            registered_company: Some("Acme (Pvt) Ltd".to_string()),
            trading_name: Some("Acme Solar".to_string()),
            ..DealerRecord::default()
        };

        assert_eq!(dealer.display_name(), "Acme Solar");
        assert_eq!(DealerRecord::default().display_name(), "");
    }
}
