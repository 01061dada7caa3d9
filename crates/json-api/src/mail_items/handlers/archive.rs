//! Archive Mail Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use mailroom::uuids::MailItemUuid;

use crate::{
    errors::{ApiError, observed},
    extensions::*,
    mail_items::responses::MailItemResponse,
    state::State,
};

/// Archive Mail Item Handler
///
/// Moves a handled item to `archived` and deactivates it.
#[endpoint(
    tags("mail-items"),
    summary = "Archive Mail Item",
    status_codes(200, 401, 403, 404, 409, 500)
)]
pub(crate) async fn handler(
    mail_item: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<MailItemResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let item = observed(
        "mail_item",
        state
            .app
            .mail_items
            .archive_mail_item(actor, MailItemUuid::from_uuid(mail_item.into_inner()))
            .await,
    )?;

    Ok(Json(item.into()))
}
