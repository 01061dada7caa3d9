//! Mail Requests Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, types::Json};

use mailroom::{
    requests::{CompletionMetadata, RequestStatus},
    uuids::{ActorUuid, LocationUuid, MailItemUuid, MailRequestUuid, MailboxUuid, TenantUuid},
};

use crate::{
    database::try_get_parsed,
    domain::requests::{data::NewMailRequest, records::MailRequestRecord},
};

const GET_REQUEST_SQL: &str = include_str!("sql/get_request.sql");
const CREATE_REQUEST_SQL: &str = include_str!("sql/create_request.sql");
const UPDATE_REQUEST_STATUS_SQL: &str = include_str!("sql/update_request_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRequestsRepository;

impl PgRequestsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_request(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        request: MailRequestUuid,
    ) -> Result<MailRequestRecord, sqlx::Error> {
        query_as::<Postgres, MailRequestRecord>(GET_REQUEST_SQL)
            .bind(tenant.into_uuid())
            .bind(request.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_request(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        item: MailItemUuid,
        requested_by: ActorUuid,
        request: NewMailRequest,
    ) -> Result<MailRequestRecord, sqlx::Error> {
        query_as::<Postgres, MailRequestRecord>(CREATE_REQUEST_SQL)
            .bind(request.uuid.into_uuid())
            .bind(tenant.into_uuid())
            .bind(item.into_uuid())
            .bind(request.request_type.as_str())
            .bind(requested_by.into_uuid())
            .bind(request.note_internal)
            .fetch_one(&mut **tx)
            .await
    }

    /// Move a request from `expected` to `next`.
    ///
    /// Returns `None` when the request is no longer in `expected`.
    #[expect(
        clippy::too_many_arguments,
        reason = "a guarded write needs both statuses and the payload"
    )]
    pub(crate) async fn update_request_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        request: MailRequestUuid,
        expected: RequestStatus,
        next: RequestStatus,
        completion_metadata: Option<&CompletionMetadata>,
        note_internal: Option<String>,
    ) -> Result<Option<MailRequestRecord>, sqlx::Error> {
        query_as::<Postgres, MailRequestRecord>(UPDATE_REQUEST_STATUS_SQL)
            .bind(tenant.into_uuid())
            .bind(request.into_uuid())
            .bind(expected.as_str())
            .bind(next.as_str())
            .bind(completion_metadata.map(Json))
            .bind(note_internal)
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for MailRequestRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: MailRequestUuid::from_uuid(row.try_get("uuid")?),
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            mail_item_uuid: MailItemUuid::from_uuid(row.try_get("mail_item_uuid")?),
            location_uuid: LocationUuid::from_uuid(row.try_get("location_uuid")?),
            mailbox_uuid: MailboxUuid::from_uuid(row.try_get("mailbox_uuid")?),
            request_type: try_get_parsed(row, "request_type")?,
            status: try_get_parsed(row, "status")?,
            requested_by: ActorUuid::from_uuid(row.try_get("requested_by")?),
            requested_at: row.try_get::<SqlxTimestamp, _>("requested_at")?.to_jiff(),
            completed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("completed_at")?
                .map(SqlxTimestamp::to_jiff),
            completion_metadata: row
                .try_get::<Option<Json<CompletionMetadata>>, _>("completion_metadata")?
                .map(|Json(metadata)| metadata),
            note_internal: row.try_get("note_internal")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
