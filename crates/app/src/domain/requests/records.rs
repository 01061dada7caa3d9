//! Mail Request Records

use jiff::Timestamp;

use mailroom::{
    mail_items::MailItemStatus,
    requests::{CompletionMetadata, RequestScope, RequestStatus, RequestType},
    uuids::{ActorUuid, LocationUuid, MailItemUuid, MailRequestUuid, MailboxUuid, TenantUuid},
};

/// Mail Request Record
///
/// `location_uuid` and `mailbox_uuid` are resolved through the referenced
/// mail item.
#[derive(Debug, Clone)]
pub struct MailRequestRecord {
    pub uuid: MailRequestUuid,
    pub tenant_uuid: TenantUuid,
    pub mail_item_uuid: MailItemUuid,
    pub location_uuid: LocationUuid,
    pub mailbox_uuid: MailboxUuid,
    pub request_type: RequestType,
    pub status: RequestStatus,
    pub requested_by: ActorUuid,
    pub requested_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub completion_metadata: Option<CompletionMetadata>,
    pub note_internal: Option<String>,
    pub updated_at: Timestamp,
}

impl MailRequestRecord {
    /// Facts the request guards decide on.
    #[must_use]
    pub fn scope(&self) -> RequestScope {
        RequestScope {
            location: self.location_uuid,
            mailbox: self.mailbox_uuid,
            requested_by: self.requested_by,
            status: self.status,
        }
    }
}

/// Outcome of a status transition.
#[derive(Debug, Clone)]
pub struct RequestTransition {
    /// The request after the transition.
    pub request: MailRequestRecord,

    /// Status before the transition.
    pub previous_status: RequestStatus,

    /// Status of the referenced mail item after the transition.
    pub mail_item_status: MailItemStatus,
}
