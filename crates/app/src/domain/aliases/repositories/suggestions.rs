//! Alias Suggestions Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use mailroom::{
    aliases::AliasSuggestionStatus,
    uuids::{
        ActorUuid, AliasSuggestionUuid, CompanyAliasUuid, CompanyUuid, LocationUuid, TenantUuid,
    },
};

use crate::{
    database::try_get_parsed,
    domain::aliases::{data::NewAliasSuggestion, records::AliasSuggestionRecord},
};

const GET_SUGGESTION_SQL: &str = include_str!("../sql/get_suggestion.sql");
const CREATE_SUGGESTION_SQL: &str = include_str!("../sql/create_suggestion.sql");
const DECIDE_SUGGESTION_SQL: &str = include_str!("../sql/decide_suggestion.sql");

/// Decision fields written by [`PgAliasSuggestionsRepository::decide_suggestion`].
#[derive(Debug, Clone)]
pub(crate) struct SuggestionDecision {
    pub(crate) status: AliasSuggestionStatus,
    pub(crate) decided_by: ActorUuid,
    pub(crate) notes: Option<String>,
    pub(crate) company_uuid: Option<CompanyUuid>,
    pub(crate) company_alias_uuid: Option<CompanyAliasUuid>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAliasSuggestionsRepository;

impl PgAliasSuggestionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_suggestion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        suggestion: AliasSuggestionUuid,
    ) -> Result<AliasSuggestionRecord, sqlx::Error> {
        query_as::<Postgres, AliasSuggestionRecord>(GET_SUGGESTION_SQL)
            .bind(tenant.into_uuid())
            .bind(suggestion.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_suggestion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        submitted_by: ActorUuid,
        suggestion: NewAliasSuggestion,
    ) -> Result<AliasSuggestionRecord, sqlx::Error> {
        query_as::<Postgres, AliasSuggestionRecord>(CREATE_SUGGESTION_SQL)
            .bind(suggestion.uuid.into_uuid())
            .bind(tenant.into_uuid())
            .bind(suggestion.location_uuid.into_uuid())
            .bind(suggestion.suggested_alias)
            .bind(suggestion.normalized_alias)
            .bind(suggestion.company_uuid.map(CompanyUuid::into_uuid))
            .bind(submitted_by.into_uuid())
            .bind(suggestion.notes)
            .fetch_one(&mut **tx)
            .await
    }

    /// Decide a suggestion that is still pending.
    ///
    /// Returns `None` when it was already decided.
    pub(crate) async fn decide_suggestion(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        tenant: TenantUuid,
        suggestion: AliasSuggestionUuid,
        decision: SuggestionDecision,
    ) -> Result<Option<AliasSuggestionRecord>, sqlx::Error> {
        query_as::<Postgres, AliasSuggestionRecord>(DECIDE_SUGGESTION_SQL)
            .bind(tenant.into_uuid())
            .bind(suggestion.into_uuid())
            .bind(decision.status.as_str())
            .bind(decision.decided_by.into_uuid())
            .bind(decision.notes)
            .bind(decision.company_uuid.map(CompanyUuid::into_uuid))
            .bind(decision.company_alias_uuid.map(CompanyAliasUuid::into_uuid))
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for AliasSuggestionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AliasSuggestionUuid::from_uuid(row.try_get("uuid")?),
            tenant_uuid: TenantUuid::from_uuid(row.try_get("tenant_uuid")?),
            location_uuid: LocationUuid::from_uuid(row.try_get("location_uuid")?),
            suggested_alias: row.try_get("suggested_alias")?,
            normalized_alias: row.try_get("normalized_alias")?,
            company_uuid: row
                .try_get::<Option<Uuid>, _>("company_uuid")?
                .map(CompanyUuid::from_uuid),
            status: try_get_parsed(row, "status")?,
            submitted_by: ActorUuid::from_uuid(row.try_get("submitted_by")?),
            decided_by: row
                .try_get::<Option<Uuid>, _>("decided_by")?
                .map(ActorUuid::from_uuid),
            decided_at: row
                .try_get::<Option<SqlxTimestamp>, _>("decided_at")?
                .map(SqlxTimestamp::to_jiff),
            notes: row.try_get("notes")?,
            company_alias_uuid: row
                .try_get::<Option<Uuid>, _>("company_alias_uuid")?
                .map(CompanyAliasUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
