//! Alias Data

use mailroom::{
    aliases::AliasType,
    uuids::{ActorUuid, AliasSuggestionUuid, CompanyAliasUuid, CompanyUuid, LocationUuid, MailboxUuid},
};

/// New Alias Suggestion Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAliasSuggestion {
    /// UUID to assign to the suggestion.
    pub uuid: AliasSuggestionUuid,

    /// Location where the text was observed.
    pub location_uuid: LocationUuid,

    /// Observed text.
    pub suggested_alias: String,

    /// Pre-normalized form, if the submitter has one.
    pub normalized_alias: Option<String>,

    /// Company the submitter believes the text refers to.
    pub company_uuid: Option<CompanyUuid>,

    /// Submitter notes.
    pub notes: Option<String>,
}

/// Routing rule created by an approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewCompanyAlias {
    pub(crate) uuid: CompanyAliasUuid,
    pub(crate) company_uuid: CompanyUuid,
    pub(crate) mailbox_uuid: Option<MailboxUuid>,
    pub(crate) alias_suggestion_uuid: AliasSuggestionUuid,
    pub(crate) alias_name: String,
    pub(crate) normalized_alias: String,
    pub(crate) alias_type: AliasType,
    pub(crate) created_by: ActorUuid,
}
