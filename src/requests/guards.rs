//! Request authorization
//!
//! Staff within location scope operate requests. A customer holds exactly one
//! narrower capability: canceling a request they created while it is still
//! `pending`.

use crate::{
    actor::{Actor, Role},
    errors::GuardError,
    requests::RequestStatus,
    uuids::{ActorUuid, LocationUuid, MailboxUuid},
};

/// What an authorized actor is allowed to do with a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Any legal transition.
    Operate,

    /// Cancel one's own pending request.
    CancelOwnPending,
}

impl Capability {
    /// Audit action recorded for a transition made with this capability.
    #[must_use]
    pub const fn audit_action(self) -> &'static str {
        match self {
            Self::Operate => "request.status_changed",
            Self::CancelOwnPending => "request.canceled_by_customer",
        }
    }
}

/// The facts about a request that authorization depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestScope {
    /// Location of the referenced mail item.
    pub location: LocationUuid,

    /// Mailbox of the referenced mail item.
    pub mailbox: MailboxUuid,

    /// Actor who created the request.
    pub requested_by: ActorUuid,

    /// Current request status.
    pub status: RequestStatus,
}

impl RequestScope {
    fn is_own(&self, actor: &Actor) -> bool {
        actor.has_role(Role::Customer) && self.requested_by == actor.uuid
    }
}

/// Decide whether `actor` may move the request in `scope` to `to`.
///
/// The status graph itself is checked separately by
/// [`RequestStatus::transition`].
///
/// # Errors
///
/// - [`GuardError::Forbidden`] for staff outside the item's location, for a
///   customer asking for anything but cancellation of a pending request, and
///   for actors with no usable role.
/// - [`GuardError::NotFound`] for a customer who did not create the request.
/// - [`GuardError::InvalidTransition`] for a customer canceling a request
///   that is already terminal.
pub fn authorize_transition(
    actor: &Actor,
    scope: &RequestScope,
    to: RequestStatus,
) -> Result<Capability, GuardError> {
    if actor.is_staff() {
        return actor
            .require_staff_at(scope.location, "transition this request")
            .map(|()| Capability::Operate);
    }

    if to != RequestStatus::Canceled {
        return if scope.is_own(actor) {
            Err(GuardError::Forbidden {
                action: "transition this request",
            })
        } else {
            Err(forbidden_or_hidden(actor))
        };
    }

    authorize_customer_cancellation(actor, scope)
}

/// Decide whether a customer may cancel the request in `scope`.
///
/// # Errors
///
/// - [`GuardError::NotFound`] unless `actor` is the customer who created it.
/// - [`GuardError::Forbidden`] once staff have started work.
/// - [`GuardError::InvalidTransition`] when the request is already terminal.
pub fn authorize_customer_cancellation(
    actor: &Actor,
    scope: &RequestScope,
) -> Result<Capability, GuardError> {
    if !scope.is_own(actor) {
        return Err(forbidden_or_hidden(actor));
    }

    match scope.status {
        RequestStatus::Pending => Ok(Capability::CancelOwnPending),
        RequestStatus::InProgress => Err(GuardError::Forbidden {
            action: "cancel a request already in progress",
        }),
        RequestStatus::Completed | RequestStatus::Canceled => scope
            .status
            .transition(RequestStatus::Canceled)
            .map(|_| Capability::CancelOwnPending),
    }
}

/// Decide whether `actor` may open a request on an item at `location` in
/// `mailbox`.
///
/// # Errors
///
/// - [`GuardError::NotFound`] when the item is outside the actor's scope.
/// - [`GuardError::Forbidden`] for actors with no usable role.
pub fn authorize_creation(
    actor: &Actor,
    location: LocationUuid,
    mailbox: MailboxUuid,
) -> Result<(), GuardError> {
    if actor.sees(location, mailbox) {
        Ok(())
    } else {
        Err(forbidden_or_hidden(actor))
    }
}

fn forbidden_or_hidden(actor: &Actor) -> GuardError {
    if actor.is_staff() || actor.has_role(Role::Customer) {
        GuardError::NotFound
    } else {
        GuardError::Forbidden {
            action: "act on mail requests",
        }
    }
}
