//! Decide Alias Suggestion Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mailroom::{
    aliases::{AliasDecision, AliasType, DecisionAction},
    uuids::{AliasSuggestionUuid, CompanyUuid},
};
use mailroom_app::domain::{aliases::records::AliasDecisionOutcome, lifecycle::LifecycleError};

use crate::{
    errors::{ApiError, observed},
    extensions::*,
    state::State,
};

/// Decision Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DecisionRequest {
    /// `approve` or `reject`
    pub action: String,

    /// Target company, required to approve
    #[salvo(schema(format = Uuid))]
    pub company_id: Option<String>,

    /// Kind of routing rule to create; defaults to `ocr_variant`
    pub alias_type: Option<String>,

    /// Why the suggestion is declined, required to reject
    pub reject_reason: Option<String>,

    /// Reviewer notes
    pub notes: Option<String>,
}

impl DecisionRequest {
    fn into_decision(self) -> Result<AliasDecision, ApiError> {
        let action: DecisionAction = self.action.parse_field("action")?;

        let company = self
            .company_id
            .as_deref()
            .map(|company| company.parse_field::<Uuid>("company_id"))
            .transpose()?;

        let alias_type = self
            .alias_type
            .as_deref()
            .map(|alias_type| alias_type.parse_field::<AliasType>("alias_type"))
            .transpose()?;

        AliasDecision::from_request(
            action,
            company.map(CompanyUuid::from_uuid),
            alias_type,
            self.reject_reason,
            self.notes,
        )
        .map_err(|guard| ApiError::from(LifecycleError::from(guard)))
    }
}

/// Decision Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DecisionResponse {
    /// Always true; failures use the error body
    pub success: bool,

    /// `approve` or `reject`
    pub action: String,

    /// The decided suggestion
    pub alias_suggestion_id: Uuid,

    /// Routing rule created by an approval
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_alias_id: Option<Uuid>,

    /// Human-readable summary
    pub message: String,
}

impl From<AliasDecisionOutcome> for DecisionResponse {
    fn from(outcome: AliasDecisionOutcome) -> Self {
        let message = match outcome.action {
            DecisionAction::Approve => "alias suggestion approved",
            DecisionAction::Reject => "alias suggestion rejected",
        };

        Self {
            success: true,
            action: outcome.action.as_str().to_string(),
            alias_suggestion_id: outcome.suggestion.uuid.into_uuid(),
            company_alias_id: outcome.company_alias.map(|alias| alias.uuid.into_uuid()),
            message: message.to_string(),
        }
    }
}

/// Decide Alias Suggestion Handler
///
/// Approves or rejects a pending suggestion. A suggestion is decided at most
/// once; later or concurrent attempts fail with `conflict`.
#[endpoint(
    tags("aliases"),
    summary = "Decide Alias Suggestion",
    status_codes(200, 401, 403, 404, 409, 422, 500)
)]
pub(crate) async fn handler(
    alias_suggestion: PathParam<Uuid>,
    json: JsonBody<DecisionRequest>,
    depot: &mut Depot,
) -> Result<Json<DecisionResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let decision = json.into_inner().into_decision()?;

    let outcome = observed(
        "alias_suggestion",
        state
            .app
            .aliases
            .decide(
                actor,
                AliasSuggestionUuid::from_uuid(alias_suggestion.into_inner()),
                decision,
            )
            .await,
    )?;

    Ok(Json(outcome.into()))
}
