//! Mail Item Data

use mailroom::{
    mail_items::PackageType,
    uuids::{MailItemUuid, MailboxUuid},
};

/// New Mail Item Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMailItem {
    /// UUID to assign to the item.
    pub uuid: MailItemUuid,

    /// Mailbox the item was addressed to.
    pub mailbox_uuid: MailboxUuid,

    /// Letter or parcel.
    pub package_type: PackageType,

    /// Inbound carrier, when known.
    pub carrier: Option<String>,

    /// Inbound tracking number, when known.
    pub tracking_number: Option<String>,
}
