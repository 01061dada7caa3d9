//! Tenant Records

use jiff::Timestamp;

use mailroom::uuids::{CompanyUuid, LocationUuid, MailboxUuid, TenantUuid};

/// Tenant Record
#[derive(Debug, Clone)]
pub struct TenantRecord {
    /// Unique tenant identifier.
    pub uuid: TenantUuid,

    /// Human-readable tenant name.
    pub name: String,

    /// Tenant creation timestamp.
    pub created_at: Timestamp,

    /// Last update timestamp.
    pub updated_at: Timestamp,

    /// Soft-delete timestamp when deleted.
    pub deleted_at: Option<Timestamp>,
}

/// Location Record
#[derive(Debug, Clone)]
pub struct LocationRecord {
    pub uuid: LocationUuid,
    pub tenant_uuid: TenantUuid,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Company Record
#[derive(Debug, Clone)]
pub struct CompanyRecord {
    pub uuid: CompanyUuid,
    pub tenant_uuid: TenantUuid,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Mailbox Record
#[derive(Debug, Clone)]
pub struct MailboxRecord {
    pub uuid: MailboxUuid,
    pub tenant_uuid: TenantUuid,
    pub location_uuid: LocationUuid,
    pub company_uuid: Option<CompanyUuid>,
    pub pmb_number: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
