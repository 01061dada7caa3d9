//! Create Request Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mailroom::uuids::{MailItemUuid, MailRequestUuid};
use mailroom_app::domain::requests::data::NewMailRequest;

use crate::{
    errors::{ApiError, observed},
    extensions::*,
    requests::responses::RequestResponse,
    state::State,
};

/// Create Request Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateRequestRequest {
    /// Client-assigned identifier; generated when omitted
    #[salvo(schema(format = Uuid))]
    pub uuid: Option<String>,

    /// `open_scan`, `forward`, `pickup`, `shred`, `recycle`, `deposit`,
    /// `leave_at_office`, `weekly_forward` or `biweekly_forward`
    pub request_type: String,

    /// Staff-only note; ignored for customers
    pub note_internal: Option<String>,
}

impl CreateRequestRequest {
    fn into_new_request(self) -> Result<NewMailRequest, ApiError> {
        let uuid = self
            .uuid
            .as_deref()
            .map(|uuid| uuid.parse_field::<Uuid>("uuid"))
            .transpose()?;

        Ok(NewMailRequest {
            uuid: uuid.map(MailRequestUuid::from_uuid).unwrap_or_default(),
            request_type: self.request_type.parse_field("request_type")?,
            note_internal: self.note_internal,
        })
    }
}

/// Create Request Handler
///
/// Opens a `pending` request against a mail item.
#[endpoint(
    tags("requests"),
    summary = "Create Request",
    status_codes(201, 401, 403, 404, 409, 422, 500)
)]
pub(crate) async fn handler(
    mail_item: PathParam<Uuid>,
    json: JsonBody<CreateRequestRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<RequestResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let request = json.into_inner().into_new_request()?;

    let request = observed(
        "request",
        state
            .app
            .requests
            .create_request(
                actor,
                MailItemUuid::from_uuid(mail_item.into_inner()),
                request,
            )
            .await,
    )?;

    res.add_header(LOCATION, format!("/requests/{}", request.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(RequestResponse::for_actor(request, actor)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use mailroom::requests::RequestType;
    use mailroom_app::domain::{lifecycle::LifecycleError, requests::MockRequestsService};

    use crate::{
        errors::ApiErrorBody,
        test_helpers::{MockApp, make_request},
    };

    use super::*;

    fn make_service(requests: MockRequestsService) -> Service {
        MockApp {
            requests,
            ..MockApp::default()
        }
        .service(Router::with_path("mail-items/{mail_item}/requests").post(handler))
    }

    #[tokio::test]
    async fn test_create_returns_201() -> TestResult {
        let item = Uuid::now_v7();
        let uuid = Uuid::now_v7();

        let mut requests = MockRequestsService::new();

        requests
            .expect_create_request()
            .once()
            .withf(move |_, mail_item, new| {
                mail_item.into_uuid() == item
                    && new.uuid.into_uuid() == uuid
                    && new.request_type == RequestType::Forward
            })
            .return_once(move |_, _, _| Ok(make_request(uuid, item)));

        let mut res = TestClient::post(format!("http://example.com/mail-items/{item}/requests"))
            .json(&json!({ "uuid": uuid, "request_type": "forward" }))
            .send(&make_service(requests))
            .await;

        let body: RequestResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/requests/{uuid}").as_str()));
        assert_eq!(body.status, "pending");
        assert_eq!(body.mail_item_id, item);

        Ok(())
    }

    #[tokio::test]
    async fn test_second_open_request_returns_409() -> TestResult {
        let mut requests = MockRequestsService::new();

        requests
            .expect_create_request()
            .once()
            .return_once(|_, _, _| {
                Err(LifecycleError::Conflict {
                    reason: "mail item already has an open request",
                })
            });

        let mut res = TestClient::post(format!(
            "http://example.com/mail-items/{}/requests",
            Uuid::now_v7()
        ))
        .json(&json!({ "request_type": "shred" }))
        .send(&make_service(requests))
        .await;

        let body: ApiErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert_eq!(body.code, "conflict");
        assert_eq!(body.message, "mail item already has an open request");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_request_type_returns_422() -> TestResult {
        let mut requests = MockRequestsService::new();

        requests.expect_create_request().never();

        let res = TestClient::post(format!(
            "http://example.com/mail-items/{}/requests",
            Uuid::now_v7()
        ))
        .json(&json!({ "request_type": "teleport" }))
        .send(&make_service(requests))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_mail_item_id_returns_422() -> TestResult {
        let mut requests = MockRequestsService::new();

        requests.expect_create_request().never();

        let mut res = TestClient::post("http://example.com/mail-items/42/requests")
            .json(&json!({ "request_type": "forward" }))
            .send(&make_service(requests))
            .await;

        let body: ApiErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(body.code, "validation_failed");
        assert_eq!(body.fields, vec!["mail_item_id"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_unreadable_body_returns_422() -> TestResult {
        let mut requests = MockRequestsService::new();

        requests.expect_create_request().never();

        let mut res = TestClient::post(format!(
            "http://example.com/mail-items/{}/requests",
            Uuid::now_v7()
        ))
        .raw_json("{\"request_type\": ")
        .send(&make_service(requests))
        .await;

        let body: ApiErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(body.fields, vec!["body"]);

        Ok(())
    }
}
