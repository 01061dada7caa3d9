//! Mail Item Records

use jiff::Timestamp;

use mailroom::{
    mail_items::{MailItemStatus, PackageType},
    uuids::{LocationUuid, MailItemUuid, MailboxUuid, TenantUuid},
};

/// Mail Item Record
///
/// `location_uuid` is resolved through the item's mailbox.
#[derive(Debug, Clone)]
pub struct MailItemRecord {
    pub uuid: MailItemUuid,
    pub tenant_uuid: TenantUuid,
    pub location_uuid: LocationUuid,
    pub mailbox_uuid: MailboxUuid,
    pub package_type: PackageType,
    pub status: MailItemStatus,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub is_active: bool,
    pub received_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
