//! Get Request Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use mailroom::uuids::MailRequestUuid;

use crate::{errors::ApiError, extensions::*, requests::responses::RequestResponse, state::State};

/// Get Request Handler
///
/// Returns a request visible to the caller.
#[endpoint(tags("requests"), summary = "Get Request", status_codes(200, 401, 404, 500))]
pub(crate) async fn handler(
    request: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<RequestResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let request = state
        .app
        .requests
        .get_request(actor, MailRequestUuid::from_uuid(request.into_inner()))
        .await?;

    Ok(Json(RequestResponse::for_actor(request, actor)))
}
