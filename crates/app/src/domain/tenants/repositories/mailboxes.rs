//! Mailboxes Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use mailroom::uuids::{CompanyUuid, LocationUuid, MailboxUuid, TenantUuid};

use crate::domain::tenants::{data::NewMailbox, records::MailboxRecord};

const CREATE_MAILBOX_SQL: &str = include_str!("../sql/create_mailbox.sql");
const GET_MAILBOX_SQL: &str = include_str!("../sql/get_mailbox.sql");
const FIND_COMPANY_MAILBOX_SQL: &str = include_str!("../sql/find_company_mailbox.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgMailboxesRepository;

impl PgMailboxesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_mailbox(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        mailbox: NewMailbox,
    ) -> Result<MailboxRecord, sqlx::Error> {
        query_as::<Postgres, MailboxRecord>(CREATE_MAILBOX_SQL)
            .bind(mailbox.uuid.into_uuid())
            .bind(tenant.into_uuid())
            .bind(mailbox.location_uuid.into_uuid())
            .bind(mailbox.company_uuid.map(CompanyUuid::into_uuid))
            .bind(mailbox.pmb_number)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_mailbox(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        mailbox: MailboxUuid,
    ) -> Result<MailboxRecord, sqlx::Error> {
        query_as::<Postgres, MailboxRecord>(GET_MAILBOX_SQL)
            .bind(tenant.into_uuid())
            .bind(mailbox.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Oldest active mailbox rented by `company`, if any.
    pub(crate) async fn find_company_mailbox(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        company: CompanyUuid,
    ) -> Result<Option<MailboxRecord>, sqlx::Error> {
        query_as::<Postgres, MailboxRecord>(FIND_COMPANY_MAILBOX_SQL)
            .bind(tenant.into_uuid())
            .bind(company.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for MailboxRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: MailboxUuid::from_uuid(row.try_get("uuid")?),
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            location_uuid: LocationUuid::from_uuid(row.try_get("location_uuid")?),
            company_uuid: row
                .try_get::<Option<Uuid>, _>("company_uuid")?
                .map(CompanyUuid::from_uuid),
            pmb_number: row.try_get("pmb_number")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
