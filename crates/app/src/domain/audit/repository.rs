//! Audit Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar, types::Json};
use uuid::Uuid;

use mailroom::uuids::{AuditRecordUuid, TenantUuid};

use crate::{
    database::try_get_parsed,
    domain::audit::{
        data::{NewAuditRecord, ResourceType},
        records::AuditRecord,
    },
};

const CREATE_AUDIT_RECORD_SQL: &str = include_str!("sql/create_audit_record.sql");
const LIST_AUDIT_RECORDS_SQL: &str = include_str!("sql/list_audit_records.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAuditRepository;

impl PgAuditRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_audit_record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: &NewAuditRecord,
    ) -> Result<AuditRecordUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(CREATE_AUDIT_RECORD_SQL)
            .bind(record.uuid.into_uuid())
            .bind(record.tenant_uuid.into_uuid())
            .bind(record.actor_uuid.into_uuid())
            .bind(&record.actor_roles)
            .bind(record.action)
            .bind(record.subject.resource_type.as_str())
            .bind(record.subject.resource_uuid)
            .bind(record.result.as_str())
            .bind(Json(&record.payload))
            .fetch_one(&mut **tx)
            .await?;

        Ok(AuditRecordUuid::from_uuid(uuid))
    }

    pub(crate) async fn list_audit_records(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        resource_type: ResourceType,
        resource_uuid: Uuid,
    ) -> Result<Vec<AuditRecord>, sqlx::Error> {
        query_as::<Postgres, AuditRecord>(LIST_AUDIT_RECORDS_SQL)
            .bind(tenant.into_uuid())
            .bind(resource_type.as_str())
            .bind(resource_uuid)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AuditRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(payload) = row.try_get::<Json<serde_json::Value>, _>("payload")?;

        Ok(Self {
            uuid: AuditRecordUuid::from_uuid(row.try_get("uuid")?),
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            actor_uuid: row.try_get::<Uuid, _>("actor_uuid")?.into(),
            actor_roles: row.try_get("actor_roles")?,
            action: row.try_get("action")?,
            resource_type: try_get_parsed(row, "resource_type")?,
            resource_uuid: row.try_get("resource_uuid")?,
            result: try_get_parsed(row, "result")?,
            payload,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
