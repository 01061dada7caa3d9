//! Tenant Data

use mailroom::uuids::{CompanyUuid, LocationUuid, MailboxUuid, TenantUuid};

/// New Tenant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewTenant {
    /// UUID to assign to the tenant row.
    pub uuid: TenantUuid,

    /// Tenant name to persist.
    pub name: String,
}

/// New Location Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub uuid: LocationUuid,
    pub name: String,
}

/// New Company Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCompany {
    pub uuid: CompanyUuid,
    pub name: String,
}

/// New Mailbox Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewMailbox {
    pub uuid: MailboxUuid,
    pub location_uuid: LocationUuid,
    pub company_uuid: Option<CompanyUuid>,
    pub pmb_number: String,
}
