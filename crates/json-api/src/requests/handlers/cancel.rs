//! Cancel Own Request Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use mailroom::uuids::MailRequestUuid;

use crate::{
    errors::{ApiError, observed},
    extensions::*,
    requests::responses::StatusChangeResponse,
    state::State,
};

/// Cancel Own Request Handler
///
/// Lets the customer who opened a request cancel it while it is `pending`.
#[endpoint(
    tags("requests"),
    summary = "Cancel Own Request",
    status_codes(200, 401, 403, 404, 409, 500)
)]
pub(crate) async fn handler(
    request: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<StatusChangeResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let transition = observed(
        "request",
        state
            .app
            .requests
            .cancel_own_request(actor, MailRequestUuid::from_uuid(request.into_inner()))
            .await,
    )?;

    Ok(Json(StatusChangeResponse::for_actor(transition, actor)))
}
