//! Receive Mail Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mailroom::uuids::{MailItemUuid, MailboxUuid};
use mailroom_app::domain::mail_items::data::NewMailItem;

use crate::{
    errors::{ApiError, observed},
    extensions::*,
    mail_items::responses::MailItemResponse,
    state::State,
};

/// Receive Mail Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReceiveMailItemRequest {
    /// Client-assigned identifier; generated when omitted
    #[salvo(schema(format = Uuid))]
    pub uuid: Option<String>,

    /// Mailbox the item is addressed to
    #[salvo(schema(format = Uuid))]
    pub mailbox_id: String,

    /// `correspondence` or `package`
    pub package_type: String,

    /// Inbound carrier
    pub carrier: Option<String>,

    /// Inbound tracking number
    pub tracking_number: Option<String>,
}

impl ReceiveMailItemRequest {
    fn into_new_mail_item(self) -> Result<NewMailItem, ApiError> {
        let uuid = self
            .uuid
            .as_deref()
            .map(|uuid| uuid.parse_field::<Uuid>("uuid"))
            .transpose()?;

        Ok(NewMailItem {
            uuid: uuid.map(MailItemUuid::from_uuid).unwrap_or_default(),
            mailbox_uuid: MailboxUuid::from_uuid(self.mailbox_id.parse_field("mailbox_id")?),
            package_type: self.package_type.parse_field("package_type")?,
            carrier: self.carrier,
            tracking_number: self.tracking_number,
        })
    }
}

/// Receive Mail Item Handler
///
/// Records an incoming item in `uploaded`.
#[endpoint(
    tags("mail-items"),
    summary = "Receive Mail Item",
    status_codes(201, 401, 403, 404, 409, 422, 500)
)]
pub(crate) async fn handler(
    json: JsonBody<ReceiveMailItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<MailItemResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let item = json.into_inner().into_new_mail_item()?;

    let item = observed(
        "mail_item",
        state.app.mail_items.receive_mail_item(actor, item).await,
    )?;

    res.add_header(LOCATION, format!("/mail-items/{}", item.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(item.into()))
}
