//! Mail Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use mailroom::{
    mail_items::MailItemStatus,
    uuids::{LocationUuid, MailItemUuid, MailboxUuid, TenantUuid},
};

use crate::{
    database::try_get_parsed,
    domain::mail_items::{data::NewMailItem, records::MailItemRecord},
};

const GET_MAIL_ITEM_SQL: &str = include_str!("sql/get_mail_item.sql");
const CREATE_MAIL_ITEM_SQL: &str = include_str!("sql/create_mail_item.sql");
const UPDATE_MAIL_ITEM_STATUS_SQL: &str = include_str!("sql/update_mail_item_status.sql");
const HAS_OPEN_REQUEST_SQL: &str = include_str!("sql/has_open_request.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgMailItemsRepository;

impl PgMailItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_mail_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        item: MailItemUuid,
    ) -> Result<MailItemRecord, sqlx::Error> {
        query_as::<Postgres, MailItemRecord>(GET_MAIL_ITEM_SQL)
            .bind(tenant.into_uuid())
            .bind(item.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_mail_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        item: NewMailItem,
    ) -> Result<MailItemRecord, sqlx::Error> {
        query_as::<Postgres, MailItemRecord>(CREATE_MAIL_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(tenant.into_uuid())
            .bind(item.mailbox_uuid.into_uuid())
            .bind(item.package_type.as_str())
            .bind(item.carrier)
            .bind(item.tracking_number)
            .fetch_one(&mut **tx)
            .await
    }

    /// Move an active item from `expected` to `next`.
    ///
    /// Returns the number of rows changed; zero means another writer got
    /// there first.
    pub(crate) async fn update_mail_item_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        item: MailItemUuid,
        expected: MailItemStatus,
        next: MailItemStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_MAIL_ITEM_STATUS_SQL)
            .bind(tenant.into_uuid())
            .bind(item.into_uuid())
            .bind(expected.as_str())
            .bind(next.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn has_open_request(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        item: MailItemUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(HAS_OPEN_REQUEST_SQL)
            .bind(tenant.into_uuid())
            .bind(item.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for MailItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: MailItemUuid::from_uuid(row.try_get("uuid")?),
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            location_uuid: LocationUuid::from_uuid(row.try_get("location_uuid")?),
            mailbox_uuid: MailboxUuid::from_uuid(row.try_get("mailbox_uuid")?),
            package_type: try_get_parsed(row, "package_type")?,
            status: try_get_parsed(row, "status")?,
            carrier: row.try_get("carrier")?,
            tracking_number: row.try_get("tracking_number")?,
            is_active: row.try_get("is_active")?,
            received_at: row.try_get::<SqlxTimestamp, _>("received_at")?.to_jiff(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
