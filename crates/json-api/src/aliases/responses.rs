//! Alias Responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mailroom_app::domain::aliases::records::{AliasSuggestionRecord, CompanyAliasRecord};

/// Alias Suggestion Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SuggestionResponse {
    /// The unique identifier of the suggestion
    pub uuid: Uuid,

    /// Location where the text was observed
    pub location_id: Uuid,

    /// Observed text
    pub suggested_alias: String,

    /// Normalized form, when supplied
    pub normalized_alias: Option<String>,

    /// Company the text is believed to refer to
    pub company_id: Option<Uuid>,

    /// `pending`, `approved` or `rejected`
    pub status: String,

    /// Who submitted the suggestion
    pub submitted_by: Uuid,

    /// Who decided the suggestion
    pub decided_by: Option<Uuid>,

    /// When the suggestion was decided
    pub decided_at: Option<String>,

    /// Submitter and reviewer notes
    pub notes: Option<String>,

    /// Routing rule created by an approval
    pub company_alias_id: Option<Uuid>,

    /// When the suggestion was submitted
    pub created_at: String,
}

impl From<AliasSuggestionRecord> for SuggestionResponse {
    fn from(suggestion: AliasSuggestionRecord) -> Self {
        Self {
            uuid: suggestion.uuid.into_uuid(),
            location_id: suggestion.location_uuid.into_uuid(),
            suggested_alias: suggestion.suggested_alias,
            normalized_alias: suggestion.normalized_alias,
            company_id: suggestion.company_uuid.map(Into::into),
            status: suggestion.status.as_str().to_string(),
            submitted_by: suggestion.submitted_by.into_uuid(),
            decided_by: suggestion.decided_by.map(Into::into),
            decided_at: suggestion.decided_at.as_ref().map(ToString::to_string),
            notes: suggestion.notes,
            company_alias_id: suggestion.company_alias_uuid.map(Into::into),
            created_at: suggestion.created_at.to_string(),
        }
    }
}

/// Company Alias Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CompanyAliasResponse {
    /// The unique identifier of the routing rule
    pub uuid: Uuid,

    /// Company mail is routed to
    pub company_id: Uuid,

    /// Mailbox mail is routed to, when the company has one
    pub mailbox_id: Option<Uuid>,

    /// Alias as observed
    pub alias_name: String,

    /// Normalized alias used for matching
    pub normalized_alias: String,

    /// Kind of routing rule
    pub alias_type: String,

    /// When the rule became active
    pub activated_at: String,
}

impl From<CompanyAliasRecord> for CompanyAliasResponse {
    fn from(alias: CompanyAliasRecord) -> Self {
        Self {
            uuid: alias.uuid.into_uuid(),
            company_id: alias.company_uuid.into_uuid(),
            mailbox_id: alias.mailbox_uuid.map(Into::into),
            alias_name: alias.alias_name,
            normalized_alias: alias.normalized_alias,
            alias_type: alias.alias_type.as_str().to_string(),
            activated_at: alias.activated_at.to_string(),
        }
    }
}
