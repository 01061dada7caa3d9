//! Mail Item Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mailroom_app::domain::mail_items::records::MailItemRecord;

/// Mail Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MailItemResponse {
    /// The unique identifier of the mail item
    pub uuid: Uuid,

    /// The mailbox the item was addressed to
    pub mailbox_id: Uuid,

    /// The location holding the item
    pub location_id: Uuid,

    /// `correspondence` or `package`
    pub package_type: String,

    /// Current lifecycle status
    pub status: String,

    /// Inbound carrier
    pub carrier: Option<String>,

    /// Inbound tracking number
    pub tracking_number: Option<String>,

    /// False once archived
    pub is_active: bool,

    /// When the item was received
    pub received_at: String,

    /// When the item last changed
    pub updated_at: String,
}

impl From<MailItemRecord> for MailItemResponse {
    fn from(item: MailItemRecord) -> Self {
        Self {
            uuid: item.uuid.into_uuid(),
            mailbox_id: item.mailbox_uuid.into_uuid(),
            location_id: item.location_uuid.into_uuid(),
            package_type: item.package_type.as_str().to_string(),
            status: item.status.as_str().to_string(),
            carrier: item.carrier,
            tracking_number: item.tracking_number,
            is_active: item.is_active,
            received_at: item.received_at.to_string(),
            updated_at: item.updated_at.to_string(),
        }
    }
}
