//! Company Aliases Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use mailroom::uuids::{
    ActorUuid, AliasSuggestionUuid, CompanyAliasUuid, CompanyUuid, MailboxUuid, TenantUuid,
};

use crate::{
    database::try_get_parsed,
    domain::aliases::{data::NewCompanyAlias, records::CompanyAliasRecord},
};

const CREATE_COMPANY_ALIAS_SQL: &str = include_str!("../sql/create_company_alias.sql");
const MATCH_COMPANY_ALIASES_SQL: &str = include_str!("../sql/match_company_aliases.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCompanyAliasesRepository;

impl PgCompanyAliasesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_company_alias(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        alias: NewCompanyAlias,
    ) -> Result<CompanyAliasRecord, sqlx::Error> {
        query_as::<Postgres, CompanyAliasRecord>(CREATE_COMPANY_ALIAS_SQL)
            .bind(alias.uuid.into_uuid())
            .bind(tenant.into_uuid())
            .bind(alias.company_uuid.into_uuid())
            .bind(alias.mailbox_uuid.map(MailboxUuid::into_uuid))
            .bind(alias.alias_suggestion_uuid.into_uuid())
            .bind(alias.alias_name)
            .bind(alias.normalized_alias)
            .bind(alias.alias_type.as_str())
            .bind(alias.created_by.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Active aliases whose normalized form equals `normalized_alias`.
    pub(crate) async fn match_company_aliases(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        normalized_alias: &str,
    ) -> Result<Vec<CompanyAliasRecord>, sqlx::Error> {
        query_as::<Postgres, CompanyAliasRecord>(MATCH_COMPANY_ALIASES_SQL)
            .bind(tenant.into_uuid())
            .bind(normalized_alias)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for CompanyAliasRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CompanyAliasUuid::from_uuid(row.try_get("uuid")?),
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            company_uuid: CompanyUuid::from_uuid(row.try_get("company_uuid")?),
            mailbox_uuid: row
                .try_get::<Option<Uuid>, _>("mailbox_uuid")?
                .map(MailboxUuid::from_uuid),
            alias_suggestion_uuid: row
                .try_get::<Option<Uuid>, _>("alias_suggestion_uuid")?
                .map(AliasSuggestionUuid::from_uuid),
            alias_name: row.try_get("alias_name")?,
            normalized_alias: row.try_get("normalized_alias")?,
            alias_type: try_get_parsed(row, "alias_type")?,
            is_active: row.try_get("is_active")?,
            activated_at: row.try_get::<SqlxTimestamp, _>("activated_at")?.to_jiff(),
            created_by: ActorUuid::from_uuid(row.try_get("created_by")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
