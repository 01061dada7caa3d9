//! Audit service.

use async_trait::async_trait;
use mockall::automock;
use tracing::Span;
use uuid::Uuid;

use mailroom::actor::Actor;

use crate::{
    database::Db,
    domain::{
        audit::{data::ResourceType, records::AuditRecord, repository::PgAuditRepository},
        lifecycle::LifecycleError,
    },
};

#[derive(Debug, Clone)]
pub struct PgAuditService {
    db: Db,
    repository: PgAuditRepository,
}

impl PgAuditService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAuditRepository::new(),
        }
    }
}

#[async_trait]
impl AuditService for PgAuditService {
    #[tracing::instrument(
        name = "audit.service.list_audit_records",
        skip(self, actor),
        fields(
            tenant_uuid = %actor.tenant,
            actor_uuid = %actor.uuid,
            record_count = tracing::field::Empty
        ),
        err
    )]
    async fn list_audit_records(
        &self,
        actor: &Actor,
        resource_type: ResourceType,
        resource_uuid: Uuid,
    ) -> Result<Vec<AuditRecord>, LifecycleError> {
        actor.require_tenant_admin("read the audit trail")?;

        let mut tx = self.db.begin_tenant_transaction(actor.tenant).await?;

        let records = self
            .repository
            .list_audit_records(&mut tx, actor.tenant, resource_type, resource_uuid)
            .await?;

        tx.commit().await?;

        Span::current().record("record_count", records.len());

        Ok(records)
    }
}

#[automock]
#[async_trait]
/// Read access to the audit trail.
pub trait AuditService: Send + Sync {
    /// Audit records for one entity, oldest first. Tenant admins only.
    async fn list_audit_records(
        &self,
        actor: &Actor,
        resource_type: ResourceType,
        resource_uuid: Uuid,
    ) -> Result<Vec<AuditRecord>, LifecycleError>;
}
