//! Submit Alias Suggestion Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mailroom::uuids::{AliasSuggestionUuid, CompanyUuid, LocationUuid};
use mailroom_app::domain::aliases::data::NewAliasSuggestion;

use crate::{
    aliases::responses::SuggestionResponse,
    errors::{ApiError, observed},
    extensions::*,
    state::State,
};

/// Submit Suggestion Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SubmitSuggestionRequest {
    /// Client-assigned identifier; generated when omitted
    #[salvo(schema(format = Uuid))]
    pub uuid: Option<String>,

    /// Location where the text was observed
    #[salvo(schema(format = Uuid))]
    pub location_id: String,

    /// Observed text
    pub suggested_alias: String,

    /// Normalized form; derived from the text when omitted
    pub normalized_alias: Option<String>,

    /// Company the text is believed to refer to
    #[salvo(schema(format = Uuid))]
    pub company_id: Option<String>,

    /// Submitter notes
    pub notes: Option<String>,
}

impl SubmitSuggestionRequest {
    fn into_new_suggestion(self) -> Result<NewAliasSuggestion, ApiError> {
        let uuid = self
            .uuid
            .as_deref()
            .map(|uuid| uuid.parse_field::<Uuid>("uuid"))
            .transpose()?;

        let company = self
            .company_id
            .as_deref()
            .map(|company| company.parse_field::<Uuid>("company_id"))
            .transpose()?;

        Ok(NewAliasSuggestion {
            uuid: uuid.map(AliasSuggestionUuid::from_uuid).unwrap_or_default(),
            location_uuid: LocationUuid::from_uuid(self.location_id.parse_field("location_id")?),
            suggested_alias: self.suggested_alias,
            normalized_alias: self.normalized_alias,
            company_uuid: company.map(CompanyUuid::from_uuid),
            notes: self.notes,
        })
    }
}

/// Submit Alias Suggestion Handler
///
/// Queues observed text for review as a `pending` suggestion.
#[endpoint(
    tags("aliases"),
    summary = "Submit Alias Suggestion",
    status_codes(201, 401, 403, 409, 422, 500)
)]
pub(crate) async fn handler(
    json: JsonBody<SubmitSuggestionRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let suggestion = json.into_inner().into_new_suggestion()?;

    let suggestion = observed(
        "alias_suggestion",
        state
            .app
            .aliases
            .submit_suggestion(actor, suggestion)
            .await,
    )?;

    res.add_header(
        LOCATION,
        format!("/alias-suggestions/{}", suggestion.uuid),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    Ok(Json(suggestion.into()))
}
