//! Companies Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use mailroom::uuids::{CompanyUuid, TenantUuid};

use crate::domain::tenants::{data::NewCompany, records::CompanyRecord};

const CREATE_COMPANY_SQL: &str = include_str!("../sql/create_company.sql");
const GET_COMPANY_SQL: &str = include_str!("../sql/get_company.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCompaniesRepository;

impl PgCompaniesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_company(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        company: NewCompany,
    ) -> Result<CompanyRecord, sqlx::Error> {
        query_as::<Postgres, CompanyRecord>(CREATE_COMPANY_SQL)
            .bind(company.uuid.into_uuid())
            .bind(tenant.into_uuid())
            .bind(company.name)
            .fetch_one(&mut **tx)
            .await
    }

    /// Live company in `tenant`; `RowNotFound` when absent or deleted.
    pub(crate) async fn get_company(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        company: CompanyUuid,
    ) -> Result<CompanyRecord, sqlx::Error> {
        query_as::<Postgres, CompanyRecord>(GET_COMPANY_SQL)
            .bind(tenant.into_uuid())
            .bind(company.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CompanyRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CompanyUuid::from_uuid(row.try_get("uuid")?),
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
