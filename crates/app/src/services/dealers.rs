//! Dealer service.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{info, warn};

use solarstore::{
    dealers::{
        DealerRecord, DealerSections, DocumentKind, RegStatus, StatusAction, UploadFile,
        available_actions, derive_sections, validate_upload,
    },
    session::{Capability, Session, allows},
};

use crate::{api::StorefrontApi, services::ServiceError};

/// A dealer snapshot with its derived section completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationProgress {
    /// Dealer record as fetched
    pub dealer: DealerRecord,

    /// Completion derived from `dealer`
    pub sections: DealerSections,
}

impl From<DealerRecord> for RegistrationProgress {
    fn from(dealer: DealerRecord) -> Self {
        Self {
            sections: derive_sections(&dealer),
            dealer,
        }
    }
}

/// Dealer registration and verification.
#[derive(Clone)]
pub struct DealerService {
    api: Arc<dyn StorefrontApi>,
}

impl std::fmt::Debug for DealerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DealerService").finish_non_exhaustive()
    }
}

impl DealerService {
    /// Create a service over `api`.
    #[must_use]
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self { api }
    }

    /// Fetch a dealer and derive its registration progress.
    ///
    /// # Errors
    ///
    /// Returns a `ServiceError` if the dealer cannot be fetched.
    pub async fn registration_progress(
        &self,
        dealer: u64,
    ) -> Result<RegistrationProgress, ServiceError> {
        Ok(self.api.get_dealer(dealer).await?.into())
    }

    /// Status actions to show for `dealer`.
    ///
    /// Nothing is offered to sessions that cannot manage dealers.
    pub fn offered_actions(
        session: Option<&Session>,
        dealer: &DealerRecord,
    ) -> SmallVec<[StatusAction; 2]> {
        if !allows(session, Capability::ManageDealers) {
            return SmallVec::new();
        }

        available_actions(&dealer.reg_status)
    }

    /// Apply a status action to a dealer, returning the new status.
    ///
    /// # Errors
    ///
    /// Returns a `ServiceError` if the session cannot manage dealers, the
    /// action is not offered for the dealer's current status, or an API call
    /// fails.
    pub async fn apply_action(
        &self,
        session: Option<&Session>,
        dealer: u64,
        action: StatusAction,
    ) -> Result<RegStatus, ServiceError> {
        if !allows(session, Capability::ManageDealers) {
            return Err(ServiceError::Forbidden(Capability::ManageDealers));
        }

        let record = self.api.get_dealer(dealer).await?;

        if !Self::offered_actions(session, &record).contains(&action) {
            warn!(dealer, status = %record.reg_status, ?action, "status action not offered");

            return Err(ServiceError::ActionUnavailable {
                status: record.reg_status,
                action,
            });
        }

        self.api.update_dealer_status(dealer, action.code()).await?;

        info!(dealer, code = action.code(), "dealer status updated");

        Ok(action.target())
    }

    /// Upload documents for one dealer document field.
    ///
    /// Files are checked before anything is sent.
    ///
    /// # Errors
    ///
    /// Returns a `ServiceError` if the session is not a dealer, the files are
    /// rejected, or the upload fails.
    pub async fn upload_documents(
        &self,
        session: Option<&Session>,
        dealer: u64,
        kind: DocumentKind,
        files: Vec<UploadFile>,
    ) -> Result<RegistrationProgress, ServiceError> {
        if !allows(session, Capability::DealerPortal) {
            return Err(ServiceError::Forbidden(Capability::DealerPortal));
        }

        validate_upload(kind, &files)?;

        let updated = self
            .api
            .upload_dealer_documents(dealer, kind, files)
            .await?;

        info!(dealer, field = kind.field_name(), "dealer documents uploaded");

        Ok(updated.into())
    }
}
