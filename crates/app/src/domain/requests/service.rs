//! Mail requests service.

use async_trait::async_trait;
use mockall::automock;
use serde_json::json;
use tracing::{Span, info, warn};

use mailroom::{
    actor::Actor,
    errors::GuardError,
    mail_items::MailItemEvent,
    requests::{
        Capability, RequestScope, RequestStatus, authorize_creation,
        authorize_customer_cancellation, authorize_transition,
    },
    uuids::{MailItemUuid, MailRequestUuid},
};

use crate::{
    database::Db,
    domain::{
        audit::data::{AuditSubject, NewAuditRecord, ResourceType},
        lifecycle::{Coordinator, LifecycleError},
        mail_items::repository::PgMailItemsRepository,
        requests::{
            data::{NewMailRequest, StatusChange},
            records::{MailRequestRecord, RequestTransition},
            repository::PgRequestsRepository,
        },
    },
};

const CREATED: &str = "request.created";

const OPEN_REQUEST_EXISTS: LifecycleError = LifecycleError::Conflict {
    reason: "mail item already has an open request",
};

const ITEM_MOVED_ON: LifecycleError = LifecycleError::Conflict {
    reason: "mail item is no longer awaiting this request",
};

/// Only staff write the internal note; customer-supplied notes are dropped.
fn staff_note(actor: &Actor, note: Option<String>) -> Option<String> {
    note.filter(|_| actor.is_staff())
}

#[derive(Debug, Clone)]
pub struct PgRequestsService {
    coordinator: Coordinator,
    requests: PgRequestsRepository,
    items: PgMailItemsRepository,
}

impl PgRequestsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            coordinator: Coordinator::new(db),
            requests: PgRequestsRepository::new(),
            items: PgMailItemsRepository::new(),
        }
    }

    async fn try_create(
        &self,
        actor: &Actor,
        item_uuid: MailItemUuid,
        mut request: NewMailRequest,
    ) -> Result<MailRequestRecord, LifecycleError> {
        request.note_internal = staff_note(actor, request.note_internal);

        let mut tx = self.coordinator.begin(actor).await?;

        let item = self
            .items
            .get_mail_item(&mut tx, actor.tenant, item_uuid)
            .await?;

        authorize_creation(actor, item.location_uuid, item.mailbox_uuid)?;

        if self
            .items
            .has_open_request(&mut tx, actor.tenant, item_uuid)
            .await?
        {
            return Err(OPEN_REQUEST_EXISTS);
        }

        let next = item
            .status
            .apply(MailItemEvent::Requested(request.request_type))?;

        let record = self
            .requests
            .create_request(&mut tx, actor.tenant, item_uuid, actor.uuid, request)
            .await
            .map_err(|error| {
                if LifecycleError::is_unique_violation(&error) {
                    OPEN_REQUEST_EXISTS
                } else {
                    error.into()
                }
            })?;

        let rows_affected = self
            .items
            .update_mail_item_status(&mut tx, actor.tenant, item_uuid, item.status, next)
            .await?;

        if rows_affected == 0 {
            return Err(LifecycleError::STALE);
        }

        self.coordinator
            .commit(
                tx,
                NewAuditRecord::success(
                    actor,
                    CREATED,
                    AuditSubject::new(ResourceType::MailRequest, record.uuid),
                    json!({
                        "mail_item_uuid": item_uuid,
                        "request_type": record.request_type.as_str(),
                        "new_status": record.status.as_str(),
                        "previous_mail_item_status": item.status.as_str(),
                        "mail_item_status": next.as_str(),
                    }),
                ),
            )
            .await?;

        Ok(record)
    }

    /// Shared body of every request transition.
    ///
    /// `authorize` decides the capability before the status graph and the
    /// completion payload are checked, so nothing is written for a denied
    /// actor.
    async fn try_transition<F>(
        &self,
        actor: &Actor,
        uuid: MailRequestUuid,
        change: StatusChange,
        authorize: F,
    ) -> Result<RequestTransition, LifecycleError>
    where
        F: FnOnce(&Actor, &RequestScope, RequestStatus) -> Result<Capability, GuardError> + Send,
    {
        let mut tx = self.coordinator.begin(actor).await?;

        let request = self.requests.get_request(&mut tx, actor.tenant, uuid).await?;

        Span::current().record("request_type", request.request_type.as_str());

        let capability = authorize(actor, &request.scope(), change.to)?;

        let previous = request.status;
        let next = previous.transition(change.to)?;

        let completion_metadata = if next == RequestStatus::Completed {
            Some(
                change
                    .completion
                    .unwrap_or_default()
                    .validate_for(request.request_type)?,
            )
        } else {
            None
        };

        let updated = self
            .requests
            .update_request_status(
                &mut tx,
                actor.tenant,
                uuid,
                previous,
                next,
                completion_metadata.as_ref(),
                staff_note(actor, change.note_internal),
            )
            .await?
            .ok_or(LifecycleError::STALE)?;

        let item = self
            .items
            .get_mail_item(&mut tx, actor.tenant, request.mail_item_uuid)
            .await?;

        let mail_item_status = if next == RequestStatus::Completed {
            let completed = match item
                .status
                .apply(MailItemEvent::Completed(request.request_type))
            {
                Ok(completed) => completed,
                Err(violation) => {
                    warn!(%violation, "mail item left the requested state");

                    return Err(ITEM_MOVED_ON);
                }
            };

            let rows_affected = self
                .items
                .update_mail_item_status(
                    &mut tx,
                    actor.tenant,
                    request.mail_item_uuid,
                    item.status,
                    completed,
                )
                .await?;

            if rows_affected == 0 {
                return Err(ITEM_MOVED_ON);
            }

            completed
        } else {
            item.status
        };

        self.coordinator
            .commit(
                tx,
                NewAuditRecord::success(
                    actor,
                    capability.audit_action(),
                    AuditSubject::new(ResourceType::MailRequest, uuid),
                    json!({
                        "mail_item_uuid": request.mail_item_uuid,
                        "request_type": request.request_type.as_str(),
                        "previous_status": previous.as_str(),
                        "new_status": next.as_str(),
                        "previous_mail_item_status": item.status.as_str(),
                        "mail_item_status": mail_item_status.as_str(),
                        "completion_metadata": completion_metadata,
                    }),
                ),
            )
            .await?;

        Ok(RequestTransition {
            request: updated,
            previous_status: previous,
            mail_item_status,
        })
    }
}

#[async_trait]
impl RequestsService for PgRequestsService {
    #[tracing::instrument(
        name = "requests.service.create_request",
        skip(self, actor, request),
        fields(
            tenant_uuid = %actor.tenant,
            actor_uuid = %actor.uuid,
            mail_item_uuid = %item,
            mail_request_uuid = %request.uuid,
            request_type = %request.request_type
        ),
        err
    )]
    async fn create_request(
        &self,
        actor: &Actor,
        item: MailItemUuid,
        request: NewMailRequest,
    ) -> Result<MailRequestRecord, LifecycleError> {
        let subject = AuditSubject::new(ResourceType::MailRequest, request.uuid);

        let result = self.try_create(actor, item, request).await;

        let record = self
            .coordinator
            .settle(actor, CREATED, subject, result)
            .await?;

        info!(mail_request_uuid = %record.uuid, "created mail request");

        Ok(record)
    }

    #[tracing::instrument(
        name = "requests.service.get_request",
        skip(self, actor),
        fields(tenant_uuid = %actor.tenant, actor_uuid = %actor.uuid, mail_request_uuid = %uuid),
        err
    )]
    async fn get_request(
        &self,
        actor: &Actor,
        uuid: MailRequestUuid,
    ) -> Result<MailRequestRecord, LifecycleError> {
        let mut tx = self.coordinator.begin(actor).await?;

        let request = self.requests.get_request(&mut tx, actor.tenant, uuid).await?;

        tx.commit().await?;

        if !actor.sees(request.location_uuid, request.mailbox_uuid) {
            return Err(LifecycleError::NotFound);
        }

        Ok(request)
    }

    #[tracing::instrument(
        name = "requests.service.transition_status",
        skip(self, actor, change),
        fields(
            tenant_uuid = %actor.tenant,
            actor_uuid = %actor.uuid,
            mail_request_uuid = %uuid,
            new_status = %change.to,
            request_type = tracing::field::Empty
        ),
        err
    )]
    async fn transition_status(
        &self,
        actor: &Actor,
        uuid: MailRequestUuid,
        change: StatusChange,
    ) -> Result<RequestTransition, LifecycleError> {
        let result = self
            .try_transition(actor, uuid, change, authorize_transition)
            .await;

        let transition = self
            .coordinator
            .settle(
                actor,
                Capability::Operate.audit_action(),
                AuditSubject::new(ResourceType::MailRequest, uuid),
                result,
            )
            .await?;

        info!(
            previous_status = %transition.previous_status,
            mail_item_status = %transition.mail_item_status,
            "transitioned mail request"
        );

        Ok(transition)
    }

    #[tracing::instrument(
        name = "requests.service.cancel_own_request",
        skip(self, actor),
        fields(
            tenant_uuid = %actor.tenant,
            actor_uuid = %actor.uuid,
            mail_request_uuid = %uuid,
            request_type = tracing::field::Empty
        ),
        err
    )]
    async fn cancel_own_request(
        &self,
        actor: &Actor,
        uuid: MailRequestUuid,
    ) -> Result<RequestTransition, LifecycleError> {
        let result = self
            .try_transition(
                actor,
                uuid,
                StatusChange::to(RequestStatus::Canceled),
                |actor, scope, _| authorize_customer_cancellation(actor, scope),
            )
            .await;

        let transition = self
            .coordinator
            .settle(
                actor,
                Capability::CancelOwnPending.audit_action(),
                AuditSubject::new(ResourceType::MailRequest, uuid),
                result,
            )
            .await?;

        info!("customer canceled mail request");

        Ok(transition)
    }
}

#[automock]
#[async_trait]
/// Fulfillment requests against mail items.
pub trait RequestsService: Send + Sync {
    /// Open a `pending` request and move the item to its requested status.
    async fn create_request(
        &self,
        actor: &Actor,
        item: MailItemUuid,
        request: NewMailRequest,
    ) -> Result<MailRequestRecord, LifecycleError>;

    /// Retrieve a request visible to `actor`.
    async fn get_request(
        &self,
        actor: &Actor,
        uuid: MailRequestUuid,
    ) -> Result<MailRequestRecord, LifecycleError>;

    /// Apply a guarded status transition.
    async fn transition_status(
        &self,
        actor: &Actor,
        uuid: MailRequestUuid,
        change: StatusChange,
    ) -> Result<RequestTransition, LifecycleError>;

    /// Cancel a pending request on behalf of the customer who created it.
    async fn cancel_own_request(
        &self,
        actor: &Actor,
        uuid: MailRequestUuid,
    ) -> Result<RequestTransition, LifecycleError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use mailroom::{
        mail_items::MailItemStatus,
        requests::{CompletionMetadata, CompletionPayload, RequestType},
        uuids::{LocationUuid, MailboxUuid},
    };

    use crate::{
        domain::{
            audit::{AuditService, data::AuditResult},
            mail_items::MailItemsService,
        },
        test::{TestContext, helpers},
    };

    use super::*;

    fn ups() -> CompletionPayload {
        CompletionPayload {
            carrier: Some("UPS".to_string()),
            tracking_number: Some("1Z999AA10123456784".to_string()),
            ..CompletionPayload::default()
        }
    }

    #[tokio::test]
    async fn create_request_moves_item_to_requested() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;

        let request = helpers::create_request(&ctx, item.uuid, RequestType::Forward).await?;

        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.requested_by, ctx.customer().uuid);

        let item = ctx.mail_items.get_mail_item(&ctx.staff(), item.uuid).await?;

        assert_eq!(item.status, MailItemStatus::ForwardRequested);

        Ok(())
    }

    #[tokio::test]
    async fn second_open_request_conflicts() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;

        helpers::create_request(&ctx, item.uuid, RequestType::Forward).await?;

        let result = helpers::create_request(&ctx, item.uuid, RequestType::Shred).await;

        assert!(
            matches!(
                result,
                Err(LifecycleError::Conflict {
                    reason: "mail item already has an open request"
                })
            ),
            "expected Conflict, got {result:?}"
        );

        let item = ctx.mail_items.get_mail_item(&ctx.staff(), item.uuid).await?;

        assert_eq!(item.status, MailItemStatus::ForwardRequested);

        Ok(())
    }

    #[tokio::test]
    async fn canceled_request_frees_the_item_for_a_new_one() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;

        let first = helpers::create_request(&ctx, item.uuid, RequestType::Forward).await?;

        ctx.requests
            .cancel_own_request(&ctx.customer(), first.uuid)
            .await?;

        let item_after_cancel = ctx.mail_items.get_mail_item(&ctx.staff(), item.uuid).await?;

        assert_eq!(item_after_cancel.status, MailItemStatus::ForwardRequested);

        helpers::create_request(&ctx, item.uuid, RequestType::Shred).await?;

        let item = ctx.mail_items.get_mail_item(&ctx.staff(), item.uuid).await?;

        assert_eq!(item.status, MailItemStatus::ShredRequested);

        Ok(())
    }

    #[tokio::test]
    async fn customers_cannot_request_on_other_mailboxes() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;
        let stranger = ctx.customer_of(MailboxUuid::new());

        let result = ctx
            .requests
            .create_request(
                &stranger,
                item.uuid,
                NewMailRequest {
                    uuid: MailRequestUuid::new(),
                    request_type: RequestType::Pickup,
                    note_internal: None,
                },
            )
            .await;

        assert!(
            matches!(result, Err(LifecycleError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn pending_forward_cannot_complete() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;
        let request = helpers::create_request(&ctx, item.uuid, RequestType::Forward).await?;

        let result = helpers::transition(
            &ctx,
            request.uuid,
            RequestStatus::Completed,
            Some(ups()),
        )
        .await;

        assert!(
            matches!(
                result,
                Err(LifecycleError::InvalidTransition {
                    current: "pending",
                    requested: "completed",
                })
            ),
            "expected InvalidTransition, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn forward_completion_ships_the_item_and_audits_once() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;
        let request = helpers::create_request(&ctx, item.uuid, RequestType::Forward).await?;

        helpers::transition(&ctx, request.uuid, RequestStatus::InProgress, None).await?;

        let transition =
            helpers::transition(&ctx, request.uuid, RequestStatus::Completed, Some(ups())).await?;

        assert_eq!(transition.previous_status, RequestStatus::InProgress);
        assert_eq!(transition.request.status, RequestStatus::Completed);
        assert_eq!(transition.mail_item_status, MailItemStatus::ForwardShipped);
        assert!(transition.request.completed_at.is_some());
        assert!(matches!(
            transition.request.completion_metadata,
            Some(CompletionMetadata::Shipment { .. })
        ));

        let audit = ctx
            .audit
            .list_audit_records(
                &ctx.admin(),
                ResourceType::MailRequest,
                request.uuid.into_uuid(),
            )
            .await?;

        let completions: Vec<_> = audit
            .iter()
            .filter(|record| record.payload["new_status"] == "completed")
            .collect();

        assert_eq!(completions.len(), 1);
        assert_eq!(
            completions.first().map(|record| &record.payload["mail_item_uuid"]),
            Some(&json!(item.uuid))
        );
        assert_eq!(
            completions.first().map(|record| &record.payload["previous_status"]),
            Some(&json!("in_progress"))
        );

        Ok(())
    }

    #[tokio::test]
    async fn forward_completion_names_missing_fields_without_writing() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;
        let request = helpers::create_request(&ctx, item.uuid, RequestType::Forward).await?;

        helpers::transition(&ctx, request.uuid, RequestStatus::InProgress, None).await?;

        let result = helpers::transition(
            &ctx,
            request.uuid,
            RequestStatus::Completed,
            Some(CompletionPayload {
                carrier: Some("UPS".to_string()),
                ..CompletionPayload::default()
            }),
        )
        .await;

        let Err(LifecycleError::ValidationFailed { fields }) = result else {
            return Err(format!("expected ValidationFailed, got {result:?}").into());
        };

        assert_eq!(fields.as_slice(), ["tracking_number"]);

        let request = ctx.requests.get_request(&ctx.staff(), request.uuid).await?;

        assert_eq!(request.status, RequestStatus::InProgress);
        assert!(request.completion_metadata.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn open_scan_requires_scan_files() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;
        let request = helpers::create_request(&ctx, item.uuid, RequestType::OpenScan).await?;

        helpers::transition(&ctx, request.uuid, RequestStatus::InProgress, None).await?;

        let empty = helpers::transition(&ctx, request.uuid, RequestStatus::Completed, None).await;

        assert!(
            matches!(empty, Err(LifecycleError::ValidationFailed { .. })),
            "expected ValidationFailed, got {empty:?}"
        );

        let scanned = helpers::transition(
            &ctx,
            request.uuid,
            RequestStatus::Completed,
            Some(CompletionPayload {
                scan_file_ids: vec!["scans/1.pdf".to_string()],
                ..CompletionPayload::default()
            }),
        )
        .await?;

        assert_eq!(scanned.mail_item_status, MailItemStatus::OpenScanCompleted);

        Ok(())
    }

    #[tokio::test]
    async fn staff_outside_the_location_are_forbidden_and_audited() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;
        let request = helpers::create_request(&ctx, item.uuid, RequestType::Pickup).await?;

        let outsider = ctx.staff_at(LocationUuid::new());

        let result = ctx
            .requests
            .transition_status(
                &outsider,
                request.uuid,
                StatusChange::to(RequestStatus::InProgress),
            )
            .await;

        assert!(
            matches!(result, Err(LifecycleError::Forbidden { .. })),
            "expected Forbidden, got {result:?}"
        );

        let audit = ctx
            .audit
            .list_audit_records(
                &ctx.admin(),
                ResourceType::MailRequest,
                request.uuid.into_uuid(),
            )
            .await?;

        assert!(
            audit.iter().any(|record| {
                record.result == AuditResult::Failure
                    && record.actor_uuid == outsider.uuid
                    && record.payload["code"] == "forbidden"
            }),
            "expected a failure audit record, got {audit:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn customers_cancel_only_pending_requests() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;
        let request = helpers::create_request(&ctx, item.uuid, RequestType::Deposit).await?;

        helpers::transition(&ctx, request.uuid, RequestStatus::InProgress, None).await?;

        let result = ctx
            .requests
            .cancel_own_request(&ctx.customer(), request.uuid)
            .await;

        assert!(
            matches!(result, Err(LifecycleError::Forbidden { .. })),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn customer_cancellation_is_audited_distinctly() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;
        let request = helpers::create_request(&ctx, item.uuid, RequestType::Recycle).await?;

        let transition = ctx
            .requests
            .cancel_own_request(&ctx.customer(), request.uuid)
            .await?;

        assert_eq!(transition.request.status, RequestStatus::Canceled);

        let audit = ctx
            .audit
            .list_audit_records(
                &ctx.admin(),
                ResourceType::MailRequest,
                request.uuid.into_uuid(),
            )
            .await?;

        assert!(
            audit
                .iter()
                .any(|record| record.action == "request.canceled_by_customer"),
            "expected a customer cancellation record, got {audit:?}"
        );

        let again = ctx
            .requests
            .cancel_own_request(&ctx.customer(), request.uuid)
            .await;

        assert!(
            matches!(again, Err(LifecycleError::InvalidTransition { .. })),
            "expected InvalidTransition, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn customers_cannot_start_work() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;
        let request = helpers::create_request(&ctx, item.uuid, RequestType::Pickup).await?;

        let result = ctx
            .requests
            .transition_status(
                &ctx.customer(),
                request.uuid,
                StatusChange::to(RequestStatus::InProgress),
            )
            .await;

        assert!(
            matches!(result, Err(LifecycleError::Forbidden { .. })),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_transitions_apply_once() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;
        let request = helpers::create_request(&ctx, item.uuid, RequestType::Pickup).await?;

        let staff = ctx.staff();

        let (start, cancel) = tokio::join!(
            ctx.requests.transition_status(
                &staff,
                request.uuid,
                StatusChange::to(RequestStatus::InProgress),
            ),
            ctx.requests.transition_status(
                &staff,
                request.uuid,
                StatusChange::to(RequestStatus::Canceled),
            ),
        );

        let successes = [start.is_ok(), cancel.is_ok()]
            .into_iter()
            .filter(|ok| *ok)
            .count();

        assert!(successes >= 1, "expected at least one success");

        // Both may succeed only in sequence: start, then cancel from in_progress.
        let request = ctx.requests.get_request(&staff, request.uuid).await?;

        if successes == 1 {
            let loser = if start.is_ok() { cancel } else { start };

            assert!(
                matches!(
                    loser,
                    Err(LifecycleError::Conflict { .. } | LifecycleError::InvalidTransition { .. })
                ),
                "expected the loser to conflict, got {loser:?}"
            );
        } else {
            assert_eq!(request.status, RequestStatus::Canceled);
        }

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_leave_one_open_request() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;

        let (forward, shred) = tokio::join!(
            helpers::create_request(&ctx, item.uuid, RequestType::Forward),
            helpers::create_request(&ctx, item.uuid, RequestType::Shred),
        );

        let (winner, loser) = match (forward, shred) {
            (Ok(winner), Err(loser)) | (Err(loser), Ok(winner)) => (winner, loser),
            (forward, shred) => {
                return Err(format!("expected one success, got {forward:?} and {shred:?}").into());
            }
        };

        assert!(
            matches!(
                loser,
                LifecycleError::Conflict {
                    reason: "mail item already has an open request"
                }
            ),
            "expected Conflict, got {loser:?}"
        );

        let open: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM mail_requests \
             WHERE mail_item_uuid = $1 AND status IN ('pending', 'in_progress')",
        )
        .bind(item.uuid.into_uuid())
        .fetch_one(ctx.db.pool())
        .await?;

        assert_eq!(open, 1);

        let expected = MailItemStatus::Uploaded
            .apply(MailItemEvent::Requested(winner.request_type))?;
        let item = ctx.mail_items.get_mail_item(&ctx.staff(), item.uuid).await?;

        assert_eq!(item.status, expected);

        Ok(())
    }

    #[tokio::test]
    async fn customer_notes_are_not_stored() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;

        let request = ctx
            .requests
            .create_request(
                &ctx.customer(),
                item.uuid,
                NewMailRequest {
                    uuid: MailRequestUuid::new(),
                    request_type: RequestType::Pickup,
                    note_internal: Some("VIP, skip the queue".to_string()),
                },
            )
            .await?;

        assert_eq!(request.note_internal, None);

        let canceled = ctx
            .requests
            .transition_status(
                &ctx.customer(),
                request.uuid,
                StatusChange {
                    to: RequestStatus::Canceled,
                    note_internal: Some("refund me".to_string()),
                    completion: None,
                },
            )
            .await?;

        assert_eq!(canceled.request.status, RequestStatus::Canceled);
        assert_eq!(canceled.request.note_internal, None);

        Ok(())
    }

    #[tokio::test]
    async fn staff_notes_are_stored() -> TestResult {
        let ctx = TestContext::new().await;
        let item = helpers::receive_item(&ctx).await?;
        let request = helpers::create_request(&ctx, item.uuid, RequestType::Pickup).await?;

        let started = ctx
            .requests
            .transition_status(
                &ctx.staff(),
                request.uuid,
                StatusChange {
                    to: RequestStatus::InProgress,
                    note_internal: Some("shelf B".to_string()),
                    completion: None,
                },
            )
            .await?;

        assert_eq!(started.request.note_internal.as_deref(), Some("shelf B"));

        Ok(())
    }
}
