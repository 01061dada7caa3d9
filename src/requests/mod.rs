//! Mail Requests
//!
//! A request is a customer or staff intent to act on exactly one mail item.
//! Its status graph is deliberately small:
//!
//! | from          | to            |
//! |---------------|---------------|
//! | `pending`     | `in_progress` |
//! | `pending`     | `canceled`    |
//! | `in_progress` | `completed`   |
//! | `in_progress` | `canceled`    |
//!
//! `completed` and `canceled` are terminal.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::GuardError,
    mail_items::{MailItemStatus, UnknownStatus},
};

pub mod completion;
pub mod guards;

pub use completion::{CompletionMetadata, CompletionPayload};
pub use guards::{
    Capability, RequestScope, authorize_creation, authorize_customer_cancellation,
    authorize_transition,
};

/// What the customer wants done with the item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    /// Open the envelope and scan the contents.
    OpenScan,

    /// Ship the item to the customer.
    Forward,

    /// Hold for in-person collection.
    Pickup,

    /// Shred the item.
    Shred,

    /// Recycle the item.
    Recycle,

    /// Deposit an enclosed check.
    Deposit,

    /// Keep the item at the office.
    LeaveAtOffice,

    /// Forward as part of the weekly batch.
    WeeklyForward,

    /// Forward as part of the fortnightly batch.
    BiweeklyForward,
}

impl RequestType {
    /// Every request type.
    pub const ALL: [Self; 9] = [
        Self::OpenScan,
        Self::Forward,
        Self::Pickup,
        Self::Shred,
        Self::Recycle,
        Self::Deposit,
        Self::LeaveAtOffice,
        Self::WeeklyForward,
        Self::BiweeklyForward,
    ];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenScan => "open_scan",
            Self::Forward => "forward",
            Self::Pickup => "pickup",
            Self::Shred => "shred",
            Self::Recycle => "recycle",
            Self::Deposit => "deposit",
            Self::LeaveAtOffice => "leave_at_office",
            Self::WeeklyForward => "weekly_forward",
            Self::BiweeklyForward => "biweekly_forward",
        }
    }

    /// Whether the item physically ships with a carrier.
    #[must_use]
    pub const fn is_forward(self) -> bool {
        matches!(
            self,
            Self::Forward | Self::WeeklyForward | Self::BiweeklyForward
        )
    }

    /// Item status entered when a request of this type is created.
    #[must_use]
    pub const fn requested_status(self) -> MailItemStatus {
        match self {
            Self::OpenScan => MailItemStatus::OpenScanRequested,
            Self::Forward | Self::WeeklyForward | Self::BiweeklyForward => {
                MailItemStatus::ForwardRequested
            }
            Self::Pickup => MailItemStatus::PickupRequested,
            Self::Shred => MailItemStatus::ShredRequested,
            Self::Recycle => MailItemStatus::RecycleRequested,
            Self::Deposit => MailItemStatus::DepositRequested,
            Self::LeaveAtOffice => MailItemStatus::LeftAtOffice,
        }
    }

    /// Item status entered when a request of this type completes.
    #[must_use]
    pub const fn completed_status(self) -> MailItemStatus {
        match self {
            Self::OpenScan => MailItemStatus::OpenScanCompleted,
            Self::Forward | Self::WeeklyForward | Self::BiweeklyForward => {
                MailItemStatus::ForwardShipped
            }
            Self::Pickup => MailItemStatus::PickedUp,
            Self::Shred | Self::Recycle => MailItemStatus::Disposed,
            Self::Deposit => MailItemStatus::Deposited,
            Self::LeaveAtOffice => MailItemStatus::LeftAtOffice,
        }
    }
}

impl Display for RequestType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|request_type| request_type.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Created, not yet picked up by staff.
    Pending,

    /// Staff are working on it.
    InProgress,

    /// Done; completion metadata recorded.
    Completed,

    /// Abandoned.
    Canceled,
}

impl RequestStatus {
    /// Every status.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Canceled,
    ];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Canceled => "canceled",
        }
    }

    /// Whether the request still blocks new requests on its item.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    /// Whether no further mutation is permitted.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_open()
    }

    /// Validate the edge `self -> to`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidTransition`] naming both statuses for any
    /// pair outside the table in the module docs, including same-status
    /// pairs and anything leaving a terminal status.
    pub const fn transition(self, to: Self) -> Result<Self, GuardError> {
        match (self, to) {
            (Self::Pending, Self::InProgress | Self::Canceled)
            | (Self::InProgress, Self::Completed | Self::Canceled) => Ok(to),
            _ => Err(GuardError::InvalidTransition {
                current: self.as_str(),
                requested: to.as_str(),
            }),
        }
    }
}

impl Display for RequestStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}
