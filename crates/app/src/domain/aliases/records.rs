//! Alias Records

use jiff::Timestamp;

use mailroom::{
    aliases::{AliasSuggestionStatus, AliasType, DecisionAction},
    uuids::{
        ActorUuid, AliasSuggestionUuid, CompanyAliasUuid, CompanyUuid, LocationUuid, MailboxUuid,
        TenantUuid,
    },
};

/// Alias Suggestion Record
#[derive(Debug, Clone)]
pub struct AliasSuggestionRecord {
    pub uuid: AliasSuggestionUuid,
    pub tenant_uuid: TenantUuid,
    pub location_uuid: LocationUuid,
    pub suggested_alias: String,
    pub normalized_alias: Option<String>,
    pub company_uuid: Option<CompanyUuid>,
    pub status: AliasSuggestionStatus,
    pub submitted_by: ActorUuid,
    pub decided_by: Option<ActorUuid>,
    pub decided_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub company_alias_uuid: Option<CompanyAliasUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Company Alias Record
#[derive(Debug, Clone)]
pub struct CompanyAliasRecord {
    pub uuid: CompanyAliasUuid,
    pub tenant_uuid: TenantUuid,
    pub company_uuid: CompanyUuid,
    pub mailbox_uuid: Option<MailboxUuid>,
    pub alias_suggestion_uuid: Option<AliasSuggestionUuid>,
    pub alias_name: String,
    pub normalized_alias: String,
    pub alias_type: AliasType,
    pub is_active: bool,
    pub activated_at: Timestamp,
    pub created_by: ActorUuid,
    pub created_at: Timestamp,
}

/// Outcome of a decision.
#[derive(Debug, Clone)]
pub struct AliasDecisionOutcome {
    /// Which decision was applied.
    pub action: DecisionAction,

    /// The suggestion after the decision.
    pub suggestion: AliasSuggestionRecord,

    /// Routing rule created by an approval.
    pub company_alias: Option<CompanyAliasRecord>,
}
