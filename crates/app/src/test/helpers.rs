//! Test Helpers

use mailroom::{
    mail_items::PackageType,
    requests::{CompletionPayload, RequestStatus, RequestType},
    uuids::{AliasSuggestionUuid, MailItemUuid, MailRequestUuid},
};

use crate::{
    domain::{
        aliases::{AliasesService, data::NewAliasSuggestion, records::AliasSuggestionRecord},
        lifecycle::LifecycleError,
        mail_items::{MailItemsService, data::NewMailItem, records::MailItemRecord},
        requests::{
            RequestsService,
            data::{NewMailRequest, StatusChange},
            records::{MailRequestRecord, RequestTransition},
        },
    },
    test::TestContext,
};

/// Staff receive a letter into the fixture mailbox.
pub(crate) async fn receive_item(ctx: &TestContext) -> Result<MailItemRecord, LifecycleError> {
    ctx.mail_items
        .receive_mail_item(
            &ctx.staff(),
            NewMailItem {
                uuid: MailItemUuid::new(),
                mailbox_uuid: ctx.mailbox_uuid,
                package_type: PackageType::Correspondence,
                carrier: None,
                tracking_number: None,
            },
        )
        .await
}

/// The fixture customer opens a request on `item`.
pub(crate) async fn create_request(
    ctx: &TestContext,
    item: MailItemUuid,
    request_type: RequestType,
) -> Result<MailRequestRecord, LifecycleError> {
    ctx.requests
        .create_request(
            &ctx.customer(),
            item,
            NewMailRequest {
                uuid: MailRequestUuid::new(),
                request_type,
                note_internal: None,
            },
        )
        .await
}

/// Fixture staff move a request to `to`.
pub(crate) async fn transition(
    ctx: &TestContext,
    request: MailRequestUuid,
    to: RequestStatus,
    completion: Option<CompletionPayload>,
) -> Result<RequestTransition, LifecycleError> {
    ctx.requests
        .transition_status(
            &ctx.staff(),
            request,
            StatusChange {
                to,
                note_internal: None,
                completion,
            },
        )
        .await
}

/// Drive a fresh request of `request_type` on `item` through to completion.
pub(crate) async fn complete_request(
    ctx: &TestContext,
    item: MailItemUuid,
    request_type: RequestType,
) -> Result<RequestTransition, LifecycleError> {
    let request = create_request(ctx, item, request_type).await?;

    transition(ctx, request.uuid, RequestStatus::InProgress, None).await?;

    let completion = CompletionPayload {
        carrier: Some("USPS".to_string()),
        tracking_number: Some("9400100000000000000000".to_string()),
        scan_file_ids: vec!["scans/front.pdf".to_string()],
        notes: None,
    };

    transition(ctx, request.uuid, RequestStatus::Completed, Some(completion)).await
}

/// Fixture staff submit `text` observed at the fixture location.
pub(crate) async fn submit_suggestion(
    ctx: &TestContext,
    text: &str,
) -> Result<AliasSuggestionRecord, LifecycleError> {
    ctx.aliases
        .submit_suggestion(
            &ctx.staff(),
            NewAliasSuggestion {
                uuid: AliasSuggestionUuid::new(),
                location_uuid: ctx.location_uuid,
                suggested_alias: text.to_string(),
                normalized_alias: None,
                company_uuid: None,
                notes: None,
            },
        )
        .await
}
