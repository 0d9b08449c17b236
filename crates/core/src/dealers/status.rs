//! Dealer registration status

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use tracing::warn;

/// Verification stage of a dealer.
///
/// The server owns this value; the client only renders it and offers the
/// actions that make sense from it. Values the client does not recognise are
/// kept verbatim in `Unknown` and offer no actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum RegStatus {
    /// Waiting for the company documents
    #[default]
    PendingDocuments,

    /// Waiting for the installation history
    PendingInstallations,

    /// Waiting for an admin decision
    PendingApproval,

    /// Approved by an admin
    Approved,

    /// Fully registered
    Registered,

    /// Suspended by an admin
    Suspended,

    /// A name or code this client does not know
    Unknown(String),
}

impl RegStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [RegStatus; 6] = [
        RegStatus::PendingDocuments,
        RegStatus::PendingInstallations,
        RegStatus::PendingApproval,
        RegStatus::Approved,
        RegStatus::Registered,
        RegStatus::Suspended,
    ];

    /// The status as the server spells it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            RegStatus::PendingDocuments => "Pending_Documents",
            RegStatus::PendingInstallations => "Pending_Installations",
            RegStatus::PendingApproval => "Pending_Approval",
            RegStatus::Approved => "Approved",
            RegStatus::Registered => "Registered",
            RegStatus::Suspended => "Suspended",
            RegStatus::Unknown(raw) => raw,
        }
    }

    /// Numeric code used by the status update endpoint.
    #[must_use]
    pub const fn code(&self) -> Option<u8> {
        match self {
            RegStatus::PendingDocuments => Some(1),
            RegStatus::PendingInstallations => Some(2),
            RegStatus::PendingApproval => Some(3),
            RegStatus::Approved => Some(4),
            RegStatus::Registered => Some(5),
            RegStatus::Suspended => Some(6),
            RegStatus::Unknown(_) => None,
        }
    }

    /// Look up a status by its numeric code.
    #[must_use]
    pub fn from_code(code: u64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.code().map(u64::from) == Some(code))
    }

    /// Look up a status by its server spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == name)
    }

    /// Check whether the dealer has been approved or registered.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self, RegStatus::Approved | RegStatus::Registered)
    }
}

impl Display for RegStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.as_str().replace('_', " "))
    }
}

impl Serialize for RegStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RegStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Code(u64),
        }

        let status = match Option::<Raw>::deserialize(deserializer)? {
            None => Self::default(),
            Some(Raw::Name(name)) => Self::from_name(&name).unwrap_or_else(|| {
                warn!(status = %name, "unrecognised registration status");

                Self::Unknown(name)
            }),
            Some(Raw::Code(code)) => Self::from_code(code).unwrap_or_else(|| {
                warn!(code, "unrecognised registration status code");

                Self::Unknown(code.to_string())
            }),
        };

        Ok(status)
    }
}

/// Status change an admin can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusAction {
    /// Approve the dealer.
    Approve,

    /// Suspend the dealer.
    Suspend,

    /// Put a suspended dealer back up for approval.
    Reinstate,
}

impl StatusAction {
    /// Status the action moves the dealer to.
    #[must_use]
    pub const fn target(self) -> RegStatus {
        match self {
            StatusAction::Approve => RegStatus::Approved,
            StatusAction::Suspend => RegStatus::Suspended,
            StatusAction::Reinstate => RegStatus::PendingApproval,
        }
    }

    /// Numeric code sent to the status update endpoint.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            StatusAction::Approve => 4,
            StatusAction::Suspend => 6,
            StatusAction::Reinstate => 3,
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            StatusAction::Approve => "Approve",
            StatusAction::Suspend => "Suspend",
            StatusAction::Reinstate => "Reinstate",
        }
    }
}

/// Actions offered for a dealer in `status`.
///
/// A suspended dealer can only be reinstated; an approved or registered one
/// can only be suspended. Unrecognised statuses offer nothing.
pub fn available_actions(status: &RegStatus) -> SmallVec<[StatusAction; 2]> {
    let mut actions = SmallVec::new();

    if matches!(status, RegStatus::Unknown(_)) {
        return actions;
    }

    if *status == RegStatus::Suspended {
        actions.push(StatusAction::Reinstate);

        return actions;
    }

    if !status.is_approved() {
        actions.push(StatusAction::Approve);
    }

    actions.push(StatusAction::Suspend);

    actions
}
