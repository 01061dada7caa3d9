//! Transaction and audit coordination.

use serde_json::json;
use sqlx::{Connection, Postgres, Transaction};
use tracing::{error, warn};

use mailroom::{actor::Actor, uuids::AuditRecordUuid};

use crate::{
    database::Db,
    domain::{
        audit::{
            PgAuditRepository,
            data::{AuditSubject, NewAuditRecord},
        },
        lifecycle::LifecycleError,
    },
};

#[derive(Debug, Clone)]
pub(crate) struct Coordinator {
    db: Db,
    audit: PgAuditRepository,
}

impl Coordinator {
    #[must_use]
    pub(crate) fn new(db: Db) -> Self {
        Self {
            db,
            audit: PgAuditRepository::new(),
        }
    }

    /// Open the actor's tenant transaction.
    pub(crate) async fn begin(
        &self,
        actor: &Actor,
    ) -> Result<Transaction<'static, Postgres>, LifecycleError> {
        Ok(self.db.begin_tenant_transaction(actor.tenant).await?)
    }

    /// Write `record` under a savepoint and commit the transaction.
    ///
    /// An audit failure rolls back only the savepoint; the primary mutation
    /// still commits and the failure is logged.
    pub(crate) async fn commit(
        &self,
        mut tx: Transaction<'static, Postgres>,
        record: NewAuditRecord,
    ) -> Result<Option<AuditRecordUuid>, LifecycleError> {
        let audit_uuid = self.audit_within(&mut tx, &record).await;

        tx.commit().await?;

        Ok(audit_uuid)
    }

    /// Pass `result` through, recording denied or lost attempts.
    pub(crate) async fn settle<T: Send>(
        &self,
        actor: &Actor,
        action: &'static str,
        subject: AuditSubject,
        result: Result<T, LifecycleError>,
    ) -> Result<T, LifecycleError> {
        if let Err(failure) = &result
            && failure.is_audited()
        {
            let record = NewAuditRecord::failure(
                actor,
                action,
                subject,
                json!({
                    "code": failure.code().as_str(),
                    "message": failure.to_string(),
                }),
            );

            if let Err(source) = self.audit_standalone(&record).await {
                error!(
                    action,
                    resource_type = %subject.resource_type,
                    resource_uuid = %subject.resource_uuid,
                    error = %source,
                    "failed to record audit failure"
                );
            }
        }

        result
    }

    async fn audit_within(
        &self,
        tx: &mut Transaction<'static, Postgres>,
        record: &NewAuditRecord,
    ) -> Option<AuditRecordUuid> {
        let mut savepoint = match Connection::begin(&mut **tx).await {
            Ok(savepoint) => savepoint,
            Err(source) => {
                error!(action = record.action, error = %source, "failed to open audit savepoint");
                return None;
            }
        };

        let inserted = self.audit.create_audit_record(&mut savepoint, record).await;

        let written = match inserted {
            Ok(uuid) => savepoint.commit().await.map(|()| uuid),
            Err(source) => {
                if let Err(rollback) = savepoint.rollback().await {
                    warn!(error = %rollback, "failed to roll back audit savepoint");
                }

                Err(source)
            }
        };

        written
            .inspect_err(|source| {
                error!(
                    action = record.action,
                    resource_type = %record.subject.resource_type,
                    resource_uuid = %record.subject.resource_uuid,
                    error = %source,
                    "failed to write audit record"
                );
            })
            .ok()
    }

    async fn audit_standalone(&self, record: &NewAuditRecord) -> Result<(), sqlx::Error> {
        let mut tx = self.db.begin_tenant_transaction(record.tenant_uuid).await?;

        self.audit.create_audit_record(&mut tx, record).await?;

        tx.commit().await
    }
}
