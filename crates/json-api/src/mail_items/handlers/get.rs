//! Get Mail Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use mailroom::uuids::MailItemUuid;

use crate::{
    errors::ApiError, extensions::*, mail_items::responses::MailItemResponse, state::State,
};

/// Get Mail Item Handler
///
/// Returns a mail item visible to the caller.
#[endpoint(
    tags("mail-items"),
    summary = "Get Mail Item",
    status_codes(200, 401, 404, 500)
)]
pub(crate) async fn handler(
    mail_item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<MailItemResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let item = state
        .app
        .mail_items
        .get_mail_item(actor, MailItemUuid::from_uuid(mail_item.into_inner()))
        .await?;

    Ok(Json(item.into()))
}
