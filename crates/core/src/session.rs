//! Session state and capability checks

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::storage::{ClientStore, StorageError, StorageKey};

/// Role carried by the session user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office administrator
    Admin,

    /// Registered reseller
    Dealer,

    /// Retail customer
    Customer,

    /// Any role this client does not know about
    #[serde(other)]
    Other,
}

/// Session user, as persisted under the `user` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Server-side user id
    pub id: u64,

    /// Full name
    #[serde(default)]
    pub full_name: String,

    /// Email address
    #[serde(default)]
    pub email: String,

    /// Phone number
    #[serde(default)]
    pub phone: String,

    /// Postal address
    #[serde(default)]
    pub address: String,

    /// Role flag
    pub role: Role,
}

/// Authenticated session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Session user
    pub user: SessionUser,

    /// API token, when one was issued
    pub token: Option<String>,
}

/// Errors raised while persisting a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Storage backend failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The session user could not be serialised.
    #[error("failed to serialise session user")]
    Serialize(#[source] serde_json::Error),
}

impl Session {
    /// Create a session.
    #[must_use]
    pub fn new(user: SessionUser, token: Option<String>) -> Self {
        Self { user, token }
    }

    /// Load the session from storage.
    ///
    /// A missing or unreadable `user` entry means there is no session.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` if the storage backend fails.
    pub fn load<S: ClientStore + ?Sized>(store: &S) -> Result<Option<Self>, SessionError> {
        let Some(raw) = store.get(StorageKey::User)? else {
            return Ok(None);
        };

        let user = match serde_json::from_str::<SessionUser>(&raw) {
            Ok(user) => user,
            Err(error) => {
                warn!(%error, "ignoring malformed session user");

                return Ok(None);
            }
        };

        let token = store.get(StorageKey::AuthToken)?;

        Ok(Some(Self { user, token }))
    }

    /// Persist the session.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` if serialisation or the storage backend fails.
    pub fn save<S: ClientStore + ?Sized>(&self, store: &mut S) -> Result<(), SessionError> {
        let user = serde_json::to_string(&self.user).map_err(SessionError::Serialize)?;

        store.set(StorageKey::User, user)?;

        match &self.token {
            Some(token) => store.set(StorageKey::AuthToken, token.clone())?,
            None => store.remove(StorageKey::AuthToken)?,
        }

        Ok(())
    }

    /// Remove the persisted session.
    ///
    /// # Errors
    ///
    /// Returns a `SessionError` if the storage backend fails.
    pub fn clear<S: ClientStore + ?Sized>(store: &mut S) -> Result<(), SessionError> {
        store.remove(StorageKey::User)?;
        store.remove(StorageKey::AuthToken)?;

        Ok(())
    }

    /// The session role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.user.role
    }
}

/// Something a session may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Submit a quotation request for a single product.
    RequestQuote,

    /// Check out the cart through the internal quotation flow.
    InternalCheckout,

    /// Open the dealer registration portal.
    DealerPortal,

    /// Open the admin back-office.
    AdminDashboard,

    /// Change dealer registration status.
    ManageDealers,
}

/// Check whether `session` grants `capability`.
///
/// Route guards and action visibility both go through this function.
#[must_use]
pub fn allows(session: Option<&Session>, capability: Capability) -> bool {
    let role = session.map(Session::role);

    match capability {
        Capability::RequestQuote => true,
        Capability::InternalCheckout | Capability::DealerPortal => role == Some(Role::Dealer),
        Capability::AdminDashboard | Capability::ManageDealers => role == Some(Role::Admin),
    }
}
