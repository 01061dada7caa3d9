//! Actors
//!
//! An [`Actor`] is the already-authenticated caller of every lifecycle
//! operation. Identity resolution happens upstream; this module only
//! interprets the claims it is handed.
//!
//! Scope policy, applied identically by every workflow:
//!
//! - `operator_admin` is tenant-wide.
//! - Every other staff role is confined to the actor's assigned locations.
//! - Customers are confined to their own mailboxes and their own requests.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    errors::GuardError,
    uuids::{ActorUuid, LocationUuid, MailboxUuid, TenantUuid},
};

/// Role held by an actor within a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Mailbox renter.
    Customer,

    /// Mailroom staff assigned to specific locations.
    LocationStaff,

    /// Operator staff; location-scoped like [`Role::LocationStaff`].
    OperatorStaff,

    /// Tenant-wide administrator.
    OperatorAdmin,
}

impl Role {
    /// Every role.
    pub const ALL: [Self; 4] = [
        Self::Customer,
        Self::LocationStaff,
        Self::OperatorStaff,
        Self::OperatorAdmin,
    ];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::LocationStaff => "location_staff",
            Self::OperatorStaff => "operator_staff",
            Self::OperatorAdmin => "operator_admin",
        }
    }

    /// Whether the role may work mail items and requests.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(
            self,
            Self::LocationStaff | Self::OperatorStaff | Self::OperatorAdmin
        )
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Unrecognised role name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownRole(name.to_string()))
    }
}

/// Authenticated caller with its role set and scope.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Actor identity.
    pub uuid: ActorUuid,

    /// Tenant every operation is scoped to.
    pub tenant: TenantUuid,

    /// Roles held within the tenant.
    pub roles: SmallVec<[Role; 2]>,

    /// Locations assigned to location-scoped staff.
    pub locations: FxHashSet<LocationUuid>,

    /// Mailboxes a customer rents.
    pub mailboxes: FxHashSet<MailboxUuid>,
}

impl Actor {
    /// Actor with no roles or assignments.
    #[must_use]
    pub fn new(uuid: ActorUuid, tenant: TenantUuid) -> Self {
        Self {
            uuid,
            tenant,
            roles: SmallVec::new(),
            locations: FxHashSet::default(),
            mailboxes: FxHashSet::default(),
        }
    }

    /// Add a role.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }

        self
    }

    /// Add an assigned location.
    #[must_use]
    pub fn with_location(mut self, location: LocationUuid) -> Self {
        self.locations.insert(location);
        self
    }

    /// Add a rented mailbox.
    #[must_use]
    pub fn with_mailbox(mut self, mailbox: MailboxUuid) -> Self {
        self.mailboxes.insert(mailbox);
        self
    }

    /// Whether the actor holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Whether the actor holds any staff-equivalent role.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.roles.iter().any(|role| role.is_staff())
    }

    /// Whether the actor is tenant-wide.
    #[must_use]
    pub fn is_tenant_admin(&self) -> bool {
        self.has_role(Role::OperatorAdmin)
    }

    /// Whether the actor's location scope includes `location`.
    #[must_use]
    pub fn covers_location(&self, location: LocationUuid) -> bool {
        self.is_tenant_admin() || self.locations.contains(&location)
    }

    /// Whether the actor rents `mailbox`.
    #[must_use]
    pub fn owns_mailbox(&self, mailbox: MailboxUuid) -> bool {
        self.mailboxes.contains(&mailbox)
    }

    /// Whether an entity at `location` in `mailbox` is visible at all.
    ///
    /// Staff see their locations; customers see their mailboxes. Anything
    /// else is reported as missing rather than forbidden.
    #[must_use]
    pub fn sees(&self, location: LocationUuid, mailbox: MailboxUuid) -> bool {
        (self.is_staff() && self.covers_location(location))
            || (self.has_role(Role::Customer) && self.owns_mailbox(mailbox))
    }

    /// Role names, sorted, for audit records.
    #[must_use]
    pub fn role_names(&self) -> Vec<String> {
        let mut roles = self.roles.clone();
        roles.sort_unstable();

        roles.iter().map(|role| role.as_str().to_string()).collect()
    }

    /// Require a staff role whose location scope covers `location`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Forbidden`] when the actor is not staff or the
    /// location is outside its scope.
    pub fn require_staff_at(
        &self,
        location: LocationUuid,
        action: &'static str,
    ) -> Result<(), GuardError> {
        if self.is_staff() && self.covers_location(location) {
            Ok(())
        } else {
            Err(GuardError::Forbidden { action })
        }
    }

    /// Require the tenant-wide admin role.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Forbidden`] for any other actor.
    pub fn require_tenant_admin(&self, action: &'static str) -> Result<(), GuardError> {
        if self.is_tenant_admin() {
            Ok(())
        } else {
            Err(GuardError::Forbidden { action })
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn roles_parse_case_insensitively() -> TestResult {
        assert_eq!("Operator_Admin".parse::<Role>()?, Role::OperatorAdmin);
        assert_eq!(" customer ".parse::<Role>()?, Role::Customer);
        assert!("janitor".parse::<Role>().is_err());

        Ok(())
    }

    #[test]
    fn admin_covers_every_location() {
        let admin = Actor::new(ActorUuid::new(), TenantUuid::new()).with_role(Role::OperatorAdmin);

        assert!(admin.covers_location(LocationUuid::new()));
    }

    #[test]
    fn location_staff_only_cover_assigned_locations() {
        let assigned = LocationUuid::new();
        let staff = Actor::new(ActorUuid::new(), TenantUuid::new())
            .with_role(Role::LocationStaff)
            .with_location(assigned);

        assert!(staff.covers_location(assigned));
        assert!(!staff.covers_location(LocationUuid::new()));
    }

    #[test]
    fn operator_staff_are_location_scoped_too() {
        let staff = Actor::new(ActorUuid::new(), TenantUuid::new()).with_role(Role::OperatorStaff);

        assert!(staff.is_staff());
        assert!(!staff.covers_location(LocationUuid::new()));
    }

    #[test]
    fn customers_are_not_staff_even_with_locations() {
        let location = LocationUuid::new();
        let customer = Actor::new(ActorUuid::new(), TenantUuid::new())
            .with_role(Role::Customer)
            .with_location(location);

        assert_eq!(
            customer.require_staff_at(location, "receive mail"),
            Err(GuardError::Forbidden {
                action: "receive mail"
            })
        );
    }

    #[test]
    fn customers_see_only_their_mailboxes() {
        let location = LocationUuid::new();
        let mailbox = MailboxUuid::new();
        let customer = Actor::new(ActorUuid::new(), TenantUuid::new())
            .with_role(Role::Customer)
            .with_mailbox(mailbox);

        assert!(customer.sees(location, mailbox));
        assert!(!customer.sees(location, MailboxUuid::new()));
    }

    #[test]
    fn role_names_are_sorted_and_deduplicated() {
        let actor = Actor::new(ActorUuid::new(), TenantUuid::new())
            .with_role(Role::OperatorAdmin)
            .with_role(Role::LocationStaff)
            .with_role(Role::OperatorAdmin);

        assert_eq!(actor.role_names(), vec!["location_staff", "operator_admin"]);
    }
}
