//! Locations Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use mailroom::uuids::{LocationUuid, TenantUuid};

use crate::domain::tenants::{data::NewLocation, records::LocationRecord};

const CREATE_LOCATION_SQL: &str = include_str!("../sql/create_location.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgLocationsRepository;

impl PgLocationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_location(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        location: NewLocation,
    ) -> Result<LocationRecord, sqlx::Error> {
        query_as::<Postgres, LocationRecord>(CREATE_LOCATION_SQL)
            .bind(location.uuid.into_uuid())
            .bind(tenant.into_uuid())
            .bind(location.name)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for LocationRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: LocationUuid::from_uuid(row.try_get("uuid")?),
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            name: row.try_get("name")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
