//! Mail Request Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mailroom::{actor::Actor, requests::CompletionMetadata};
use mailroom_app::domain::requests::records::{MailRequestRecord, RequestTransition};

/// Completion Details
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CompletionResponse {
    /// `shipment`, `scan` or `handled`
    pub kind: String,

    /// Shipping carrier, for shipments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,

    /// Tracking number, for shipments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,

    /// Uploaded scan files, for scans
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scan_file_ids: Vec<String>,

    /// Staff notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<CompletionMetadata> for CompletionResponse {
    fn from(metadata: CompletionMetadata) -> Self {
        match metadata {
            CompletionMetadata::Shipment {
                carrier,
                tracking_number,
                notes,
            } => Self {
                kind: "shipment".to_string(),
                carrier: Some(carrier),
                tracking_number: Some(tracking_number),
                scan_file_ids: Vec::new(),
                notes,
            },
            CompletionMetadata::Scan {
                scan_file_ids,
                notes,
            } => Self {
                kind: "scan".to_string(),
                carrier: None,
                tracking_number: None,
                scan_file_ids,
                notes,
            },
            CompletionMetadata::Handled { notes } => Self {
                kind: "handled".to_string(),
                carrier: None,
                tracking_number: None,
                scan_file_ids: Vec::new(),
                notes,
            },
        }
    }
}

/// Mail Request Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RequestResponse {
    /// The unique identifier of the request
    pub uuid: Uuid,

    /// The mail item the request acts on
    pub mail_item_id: Uuid,

    /// What should happen to the item
    pub request_type: String,

    /// Current request status
    pub status: String,

    /// Who opened the request
    pub requested_by: Uuid,

    /// When the request was opened
    pub requested_at: String,

    /// When the request was completed
    pub completed_at: Option<String>,

    /// What staff recorded on completion
    pub completion: Option<CompletionResponse>,

    /// Staff-only note, omitted for customers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_internal: Option<String>,

    /// When the request last changed
    pub updated_at: String,
}

impl RequestResponse {
    /// Render `request` as seen by `actor`.
    pub(crate) fn for_actor(request: MailRequestRecord, actor: &Actor) -> Self {
        Self {
            uuid: request.uuid.into_uuid(),
            mail_item_id: request.mail_item_uuid.into_uuid(),
            request_type: request.request_type.as_str().to_string(),
            status: request.status.as_str().to_string(),
            requested_by: request.requested_by.into_uuid(),
            requested_at: request.requested_at.to_string(),
            completed_at: request.completed_at.as_ref().map(ToString::to_string),
            completion: request.completion_metadata.map(CompletionResponse::from),
            note_internal: request.note_internal.filter(|_| actor.is_staff()),
            updated_at: request.updated_at.to_string(),
        }
    }
}

/// Status Change Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct StatusChangeResponse {
    /// The request after the change
    pub request: RequestResponse,

    /// Status before the change
    pub previous_status: String,

    /// Status of the mail item after the change
    pub mail_item_status: String,

    /// Human-readable summary
    pub message: String,
}

impl StatusChangeResponse {
    pub(crate) fn for_actor(transition: RequestTransition, actor: &Actor) -> Self {
        let message = format!(
            "request moved from {} to {}",
            transition.previous_status, transition.request.status
        );

        Self {
            previous_status: transition.previous_status.as_str().to_string(),
            mail_item_status: transition.mail_item_status.as_str().to_string(),
            request: RequestResponse::for_actor(transition.request, actor),
            message,
        }
    }
}
