//! Transition Request Status Handler

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

use mailroom::{requests::CompletionPayload, uuids::MailRequestUuid};
use mailroom_app::domain::requests::data::StatusChange;

use crate::{
    errors::{ApiError, observed},
    extensions::*,
    requests::responses::StatusChangeResponse,
    state::State,
};

/// Completion Fields
///
/// Which fields are required depends on the request type: forwards need
/// `carrier` and `tracking_number`, open scans need `scan_file_ids`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CompletionRequest {
    /// Shipping carrier
    pub carrier: Option<String>,

    /// Carrier tracking number
    pub tracking_number: Option<String>,

    /// Uploaded scan files
    #[serde(default)]
    pub scan_file_ids: Vec<String>,

    /// Staff notes
    pub notes: Option<String>,
}

impl From<CompletionRequest> for CompletionPayload {
    fn from(request: CompletionRequest) -> Self {
        Self {
            carrier: request.carrier,
            tracking_number: request.tracking_number,
            scan_file_ids: request.scan_file_ids,
            notes: request.notes,
        }
    }
}

/// Transition Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TransitionStatusRequest {
    /// `pending`, `in_progress`, `completed` or `canceled`
    pub new_status: String,

    /// Replaces the staff-only note; ignored for customers
    pub note_internal: Option<String>,

    /// Completion fields, read when `new_status` is `completed`
    pub completion: Option<CompletionRequest>,
}

impl TransitionStatusRequest {
    fn into_status_change(self) -> Result<StatusChange, ApiError> {
        Ok(StatusChange {
            to: self.new_status.parse_field("new_status")?,
            note_internal: self.note_internal,
            completion: self.completion.map(CompletionPayload::from),
        })
    }
}

/// Transition Request Status Handler
///
/// Moves a request along its lifecycle. Completing a request also moves the
/// referenced mail item to its completed status.
#[endpoint(
    tags("requests"),
    summary = "Transition Request Status",
    status_codes(200, 401, 403, 404, 409, 422, 500)
)]
pub(crate) async fn handler(
    request: PathParam<Uuid>,
    json: JsonBody<TransitionStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<StatusChangeResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let change = json.into_inner().into_status_change()?;

    let transition = observed(
        "request",
        state
            .app
            .requests
            .transition_status(
                actor,
                MailRequestUuid::from_uuid(request.into_inner()),
                change,
            )
            .await,
    )?;

    Ok(Json(StatusChangeResponse::for_actor(transition, actor)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use mailroom::{
        mail_items::MailItemStatus,
        requests::{CompletionMetadata, RequestStatus},
    };
    use mailroom_app::domain::{
        lifecycle::LifecycleError,
        requests::{MockRequestsService, records::RequestTransition},
    };

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
        .service(Router::with_path("requests/{request}/status").post(handler))
    }

    #[tokio::test]
    async fn test_forward_completion_returns_shipped_item() -> TestResult {
        let uuid = Uuid::now_v7();

        let mut requests = MockRequestsService::new();

        requests
            .expect_transition_status()
            .once()
            .withf(move |_, request, change| {
                let completion = change.completion.as_ref();

                request.into_uuid() == uuid
                    && change.to == RequestStatus::Completed
                    && completion.and_then(|c| c.carrier.as_deref()) == Some("UPS")
                    && completion.and_then(|c| c.tracking_number.as_deref()) == Some("1Z999")
            })
            .return_once(move |_, _, _| {
                let mut request = make_request(uuid, Uuid::now_v7());

                request.status = RequestStatus::Completed;
                request.completion_metadata = Some(CompletionMetadata::Shipment {
                    carrier: "UPS".to_string(),
                    tracking_number: "1Z999".to_string(),
                    notes: None,
                });

                Ok(RequestTransition {
                    request,
                    previous_status: RequestStatus::InProgress,
                    mail_item_status: MailItemStatus::ForwardShipped,
                })
            });

        let mut res = TestClient::post(format!("http://example.com/requests/{uuid}/status"))
            .json(&json!({
                "new_status": "completed",
                "completion": { "carrier": "UPS", "tracking_number": "1Z999" },
            }))
            .send(&make_service(requests))
            .await;

        let body: StatusChangeResponse = res.take_json().await?;
        let completion = body.request.completion.as_ref();

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.previous_status, "in_progress");
        assert_eq!(body.request.status, "completed");
        assert_eq!(body.mail_item_status, "forward_shipped");
        assert_eq!(body.message, "request moved from in_progress to completed");
        assert_eq!(completion.map(|c| c.kind.as_str()), Some("shipment"));

        Ok(())
    }

    #[tokio::test]
    async fn test_completing_a_pending_request_returns_409() -> TestResult {
        let mut requests = MockRequestsService::new();

        requests
            .expect_transition_status()
            .once()
            .return_once(|_, _, _| {
                Err(LifecycleError::InvalidTransition {
                    current: "pending",
                    requested: "completed",
                })
            });

        let mut res = TestClient::post(format!(
            "http://example.com/requests/{}/status",
            Uuid::now_v7()
        ))
        .json(&json!({
            "new_status": "completed",
            "completion": { "carrier": "UPS", "tracking_number": "1Z999" },
        }))
        .send(&make_service(requests))
        .await;

        let body: ApiErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert_eq!(body.code, "invalid_transition");
        assert_eq!(body.current_status.as_deref(), Some("pending"));
        assert_eq!(body.requested_status.as_deref(), Some("completed"));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_completion_fields_return_422() -> TestResult {
        let mut requests = MockRequestsService::new();

        requests
            .expect_transition_status()
            .once()
            .return_once(|_, _, _| {
                Err(LifecycleError::ValidationFailed {
                    fields: ["tracking_number"].into_iter().collect(),
                })
            });

        let mut res = TestClient::post(format!(
            "http://example.com/requests/{}/status",
            Uuid::now_v7()
        ))
        .json(&json!({ "new_status": "completed", "completion": { "carrier": "UPS" } }))
        .send(&make_service(requests))
        .await;

        let body: ApiErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(body.code, "validation_failed");
        assert_eq!(body.fields, vec!["tracking_number"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_scope_staff_returns_403() -> TestResult {
        let mut requests = MockRequestsService::new();

        requests
            .expect_transition_status()
            .once()
            .return_once(|_, _, _| {
                Err(LifecycleError::Forbidden {
                    action: "work requests at this location",
                })
            });

        let mut res = TestClient::post(format!(
            "http://example.com/requests/{}/status",
            Uuid::now_v7()
        ))
        .json(&json!({ "new_status": "in_progress" }))
        .send(&make_service(requests))
        .await;

        let body: ApiErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        assert_eq!(body.code, "forbidden");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_status_returns_422_without_calling_the_service() -> TestResult {
        let mut requests = MockRequestsService::new();

        requests.expect_transition_status().never();

        let mut res = TestClient::post(format!(
            "http://example.com/requests/{}/status",
            Uuid::now_v7()
        ))
        .json(&json!({ "new_status": "shipped" }))
        .send(&make_service(requests))
        .await;

        let body: ApiErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));
        assert_eq!(body.fields, vec!["new_status"]);

        Ok(())
    }
}
