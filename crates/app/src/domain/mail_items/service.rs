//! Mail items service.

use async_trait::async_trait;
use mockall::automock;
use serde_json::json;
use tracing::info;

use mailroom::{
    actor::Actor,
    mail_items::{MailItemEvent, MailItemStatus},
    uuids::MailItemUuid,
};

use crate::{
    database::Db,
    domain::{
        audit::data::{AuditSubject, NewAuditRecord, ResourceType},
        lifecycle::{Coordinator, LifecycleError},
        mail_items::{data::NewMailItem, records::MailItemRecord, repository::PgMailItemsRepository},
        tenants::repositories::PgMailboxesRepository,
    },
};

const RECEIVED: &str = "mail_item.received";
const ARCHIVED: &str = "mail_item.archived";

#[derive(Debug, Clone)]
pub struct PgMailItemsService {
    coordinator: Coordinator,
    items: PgMailItemsRepository,
    mailboxes: PgMailboxesRepository,
}

impl PgMailItemsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            coordinator: Coordinator::new(db),
            items: PgMailItemsRepository::new(),
            mailboxes: PgMailboxesRepository::new(),
        }
    }

    async fn try_receive(
        &self,
        actor: &Actor,
        item: NewMailItem,
    ) -> Result<MailItemRecord, LifecycleError> {
        let mut tx = self.coordinator.begin(actor).await?;

        let mailbox = self
            .mailboxes
            .get_mailbox(&mut tx, actor.tenant, item.mailbox_uuid)
            .await?;

        actor.require_staff_at(mailbox.location_uuid, "receive mail at this location")?;

        if !mailbox.is_active {
            return Err(LifecycleError::NotFound);
        }

        let record = self.items.create_mail_item(&mut tx, actor.tenant, item).await?;

        self.coordinator
            .commit(
                tx,
                NewAuditRecord::success(
                    actor,
                    RECEIVED,
                    AuditSubject::new(ResourceType::MailItem, record.uuid),
                    json!({
                        "mailbox_uuid": record.mailbox_uuid,
                        "package_type": record.package_type.as_str(),
                        "status": record.status.as_str(),
                    }),
                ),
            )
            .await?;

        Ok(record)
    }

    async fn try_archive(
        &self,
        actor: &Actor,
        uuid: MailItemUuid,
    ) -> Result<MailItemRecord, LifecycleError> {
        let mut tx = self.coordinator.begin(actor).await?;

        let mut item = self.items.get_mail_item(&mut tx, actor.tenant, uuid).await?;

        if !actor.is_staff() && !actor.sees(item.location_uuid, item.mailbox_uuid) {
            return Err(LifecycleError::NotFound);
        }

        actor.require_staff_at(item.location_uuid, "archive mail at this location")?;

        let previous = item.status;
        let next = previous.apply(MailItemEvent::Archived)?;

        let rows_affected = self
            .items
            .update_mail_item_status(&mut tx, actor.tenant, uuid, previous, next)
            .await?;

        if rows_affected == 0 {
            return Err(LifecycleError::STALE);
        }

        item.status = next;
        item.is_active = false;

        self.coordinator
            .commit(
                tx,
                NewAuditRecord::success(
                    actor,
                    ARCHIVED,
                    AuditSubject::new(ResourceType::MailItem, uuid),
                    json!({
                        "previous_status": previous.as_str(),
                        "new_status": MailItemStatus::Archived.as_str(),
                    }),
                ),
            )
            .await?;

        Ok(item)
    }
}

#[async_trait]
impl MailItemsService for PgMailItemsService {
    #[tracing::instrument(
        name = "mail_items.service.receive_mail_item",
        skip(self, actor, item),
        fields(
            tenant_uuid = %actor.tenant,
            actor_uuid = %actor.uuid,
            mail_item_uuid = %item.uuid,
            mailbox_uuid = %item.mailbox_uuid
        ),
        err
    )]
    async fn receive_mail_item(
        &self,
        actor: &Actor,
        item: NewMailItem,
    ) -> Result<MailItemRecord, LifecycleError> {
        let subject = AuditSubject::new(ResourceType::MailItem, item.uuid);

        let result = self.try_receive(actor, item).await;

        let record = self
            .coordinator
            .settle(actor, RECEIVED, subject, result)
            .await?;

        info!(mail_item_uuid = %record.uuid, "received mail item");

        Ok(record)
    }

    #[tracing::instrument(
        name = "mail_items.service.get_mail_item",
        skip(self, actor),
        fields(tenant_uuid = %actor.tenant, actor_uuid = %actor.uuid, mail_item_uuid = %uuid),
        err
    )]
    async fn get_mail_item(
        &self,
        actor: &Actor,
        uuid: MailItemUuid,
    ) -> Result<MailItemRecord, LifecycleError> {
        let mut tx = self.coordinator.begin(actor).await?;

        let item = self.items.get_mail_item(&mut tx, actor.tenant, uuid).await?;

        tx.commit().await?;

        if !actor.sees(item.location_uuid, item.mailbox_uuid) {
            return Err(LifecycleError::NotFound);
        }

        Ok(item)
    }

    #[tracing::instrument(
        name = "mail_items.service.archive_mail_item",
        skip(self, actor),
        fields(tenant_uuid = %actor.tenant, actor_uuid = %actor.uuid, mail_item_uuid = %uuid),
        err
    )]
    async fn archive_mail_item(
        &self,
        actor: &Actor,
        uuid: MailItemUuid,
    ) -> Result<MailItemRecord, LifecycleError> {
        let result = self.try_archive(actor, uuid).await;

        let record = self
            .coordinator
            .settle(
                actor,
                ARCHIVED,
                AuditSubject::new(ResourceType::MailItem, uuid),
                result,
            )
            .await?;

        info!(mail_item_uuid = %record.uuid, "archived mail item");

        Ok(record)
    }
}

#[automock]
#[async_trait]
/// Mail item intake and retirement.
pub trait MailItemsService: Send + Sync {
    /// Record a newly received item in `uploaded`.
    async fn receive_mail_item(
        &self,
        actor: &Actor,
        item: NewMailItem,
    ) -> Result<MailItemRecord, LifecycleError>;

    /// Retrieve an item visible to `actor`.
    async fn get_mail_item(
        &self,
        actor: &Actor,
        uuid: MailItemUuid,
    ) -> Result<MailItemRecord, LifecycleError>;

    /// Move an item from a terminal status to `archived`.
    async fn archive_mail_item(
        &self,
        actor: &Actor,
        uuid: MailItemUuid,
    ) -> Result<MailItemRecord, LifecycleError>;
}
