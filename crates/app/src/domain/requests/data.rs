//! Mail Request Data

use mailroom::{
    requests::{CompletionPayload, RequestStatus, RequestType},
    uuids::MailRequestUuid,
};

/// New Mail Request Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMailRequest {
    /// UUID to assign to the request.
    pub uuid: MailRequestUuid,

    /// What should happen to the item.
    pub request_type: RequestType,

    /// Staff-only note.
    pub note_internal: Option<String>,
}

/// Requested change of a request's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Target status.
    pub to: RequestStatus,

    /// Replaces the staff note when present.
    pub note_internal: Option<String>,

    /// Completion fields, read only when `to` is `completed`.
    pub completion: Option<CompletionPayload>,
}

impl StatusChange {
    /// Change to `to` with no note or payload.
    #[must_use]
    pub fn to(to: RequestStatus) -> Self {
        Self {
            to,
            note_internal: None,
            completion: None,
        }
    }

    /// Attach a completion payload.
    #[must_use]
    pub fn with_completion(mut self, completion: CompletionPayload) -> Self {
        self.completion = Some(completion);
        self
    }
}
