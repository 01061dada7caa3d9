//! Mail Items
//!
//! Status graph of a physical mail item:
//!
//! ```text
//! uploaded ─┬─> {open_scan, forward, pickup, shred, recycle, deposit}_requested
//!           │        └─> {open_scan_completed, forward_shipped, picked_up, disposed, deposited}
//!           └─> left_at_office
//! any terminal status ─> archived
//! ```
//!
//! `…_requested` statuses are entered only by creating a request, completed
//! statuses only by completing one. Nothing ever returns to `uploaded`.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{errors::GuardError, requests::RequestType};

/// Kind of physical item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    /// Letters and flats.
    Correspondence,

    /// Parcels.
    Package,
}

impl PackageType {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Correspondence => "correspondence",
            Self::Package => "package",
        }
    }
}

impl FromStr for PackageType {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correspondence" => Ok(Self::Correspondence),
            "package" => Ok(Self::Package),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Status of a mail item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailItemStatus {
    /// Received and recorded; awaiting a customer decision.
    Uploaded,

    /// An open-and-scan request is open.
    OpenScanRequested,

    /// A forward request is open.
    ForwardRequested,

    /// A pickup request is open.
    PickupRequested,

    /// A shred request is open.
    ShredRequested,

    /// A recycle request is open.
    RecycleRequested,

    /// A deposit request is open.
    DepositRequested,

    /// Contents were scanned.
    OpenScanCompleted,

    /// Item left the building with a carrier.
    ForwardShipped,

    /// Customer collected the item.
    PickedUp,

    /// Item was shredded or recycled.
    Disposed,

    /// Check was deposited.
    Deposited,

    /// Item stays at the office.
    LeftAtOffice,

    /// Retired from the active set.
    Archived,
}

impl MailItemStatus {
    /// Every status.
    pub const ALL: [Self; 14] = [
        Self::Uploaded,
        Self::OpenScanRequested,
        Self::ForwardRequested,
        Self::PickupRequested,
        Self::ShredRequested,
        Self::RecycleRequested,
        Self::DepositRequested,
        Self::OpenScanCompleted,
        Self::ForwardShipped,
        Self::PickedUp,
        Self::Disposed,
        Self::Deposited,
        Self::LeftAtOffice,
        Self::Archived,
    ];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::OpenScanRequested => "open_scan_requested",
            Self::ForwardRequested => "forward_requested",
            Self::PickupRequested => "pickup_requested",
            Self::ShredRequested => "shred_requested",
            Self::RecycleRequested => "recycle_requested",
            Self::DepositRequested => "deposit_requested",
            Self::OpenScanCompleted => "open_scan_completed",
            Self::ForwardShipped => "forward_shipped",
            Self::PickedUp => "picked_up",
            Self::Disposed => "disposed",
            Self::Deposited => "deposited",
            Self::LeftAtOffice => "left_at_office",
            Self::Archived => "archived",
        }
    }

    /// Whether a request is (or was last) driving the item.
    #[must_use]
    pub const fn is_requested(self) -> bool {
        matches!(
            self,
            Self::OpenScanRequested
                | Self::ForwardRequested
                | Self::PickupRequested
                | Self::ShredRequested
                | Self::RecycleRequested
                | Self::DepositRequested
        )
    }

    /// Whether the item reached a disposition and may be archived.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::OpenScanCompleted
                | Self::ForwardShipped
                | Self::PickedUp
                | Self::Disposed
                | Self::Deposited
                | Self::LeftAtOffice
        )
    }

    /// Apply `event`, returning the next status.
    ///
    /// # Errors
    ///
    /// Returns a [`StateViolation`] when `event` is not an edge out of the
    /// current status.
    pub fn apply(self, event: MailItemEvent) -> Result<Self, StateViolation> {
        let next = match event {
            MailItemEvent::Requested(request_type)
                if self == Self::Uploaded || self.is_requested() =>
            {
                Some(request_type.requested_status())
            }
            MailItemEvent::Completed(request_type) if self == request_type.requested_status() => {
                Some(request_type.completed_status())
            }
            MailItemEvent::Archived if self.is_terminal() => Some(Self::Archived),
            MailItemEvent::Requested(_) | MailItemEvent::Completed(_) | MailItemEvent::Archived => {
                None
            }
        };

        next.ok_or(StateViolation {
            current: self,
            event,
        })
    }
}

impl Display for MailItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unrecognised status or enum value read from storage or input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown value: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for MailItemStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Something that happened to a mail item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailItemEvent {
    /// A request of the given type was created.
    Requested(RequestType),

    /// A request of the given type was completed.
    Completed(RequestType),

    /// Staff archived the item.
    Archived,
}

impl MailItemEvent {
    /// Status the event would lead to, for error reporting.
    #[must_use]
    pub const fn target(self) -> MailItemStatus {
        match self {
            Self::Requested(request_type) => request_type.requested_status(),
            Self::Completed(request_type) => request_type.completed_status(),
            Self::Archived => MailItemStatus::Archived,
        }
    }
}

/// Rejected mail item transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("mail item in {current} cannot move to {}", .event.target())]
pub struct StateViolation {
    /// Status the item is in.
    pub current: MailItemStatus,

    /// Event that was rejected.
    pub event: MailItemEvent,
}

impl From<StateViolation> for GuardError {
    fn from(violation: StateViolation) -> Self {
        Self::InvalidTransition {
            current: violation.current.as_str(),
            requested: violation.event.target().as_str(),
        }
    }
}
