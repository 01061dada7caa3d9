//! Get Alias Suggestion Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use mailroom::uuids::AliasSuggestionUuid;

use crate::{
    aliases::responses::SuggestionResponse, errors::ApiError, extensions::*, state::State,
};

/// Get Alias Suggestion Handler
///
/// Returns a suggestion at one of the caller's locations.
#[endpoint(
    tags("aliases"),
    summary = "Get Alias Suggestion",
    status_codes(200, 401, 404, 500)
)]
pub(crate) async fn handler(
    alias_suggestion: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<SuggestionResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let suggestion = state
        .app
        .aliases
        .get_suggestion(
            actor,
            AliasSuggestionUuid::from_uuid(alias_suggestion.into_inner()),
        )
        .await?;

    Ok(Json(suggestion.into()))
}
