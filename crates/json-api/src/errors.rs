//! Uniform error body.
//!
//! Every failing endpoint renders an [`ApiErrorBody`] with the HTTP status
//! implied by its [`ErrorCode`].

use std::fmt;

use salvo::{
    http::{ParseError, ResBody, StatusCode},
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::*,
    writing::Scribe,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use mailroom::errors::ErrorCode;
use mailroom_app::domain::lifecycle::LifecycleError;

use crate::observability::{observe_lifecycle_outcome, record_error_code};

/// Error Response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ApiErrorBody {
    /// Stable machine-readable code
    pub code: String,

    /// Human-readable message
    pub message: String,

    /// Offending input fields, for `validation_failed`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,

    /// Status the entity is in, for `invalid_transition`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_status: Option<String>,

    /// Status that was asked for, for `invalid_transition`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_status: Option<String>,
}

/// A failed API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiError {
    code: ErrorCode,
    body: ApiErrorBody,
}

impl ApiError {
    fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            body: ApiErrorBody {
                code: code.as_str().to_string(),
                message: message.into(),
                fields: Vec::new(),
                current_status: None,
                requested_status: None,
            },
        }
    }

    /// No usable actor identity.
    pub(crate) fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Malformed input naming the offending fields.
    pub(crate) fn invalid_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        let fields: Vec<String> = fields.into_iter().map(str::to_string).collect();

        let mut error = Self::new(
            ErrorCode::ValidationFailed,
            format!("validation failed for: {}", fields.join(", ")),
        );

        error.body.fields = fields;
        error
    }

    /// Unexpected failure; details stay in the logs.
    pub(crate) fn internal() -> Self {
        Self::new(ErrorCode::Internal, "internal error")
    }

    /// Taxonomy code.
    pub(crate) const fn code(&self) -> ErrorCode {
        self.code
    }

    /// HTTP status for the code.
    pub(crate) const fn status_code(&self) -> StatusCode {
        match self.code {
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::InvalidTransition | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.body.code, self.body.message)
    }
}

impl std::error::Error for ApiError {}

impl From<LifecycleError> for ApiError {
    fn from(error: LifecycleError) -> Self {
        let code = error.code();
        let message = error.to_string();

        match error {
            LifecycleError::ValidationFailed { fields } => Self::invalid_fields(fields),
            LifecycleError::InvalidTransition { current, requested } => {
                let mut api = Self::new(code, message);

                api.body.current_status = Some(current.to_string());
                api.body.requested_status = Some(requested.to_string());
                api
            }
            LifecycleError::Rejected(source) => {
                warn!("storage rejected lifecycle write: {source}");

                Self::new(code, "record rejected by storage constraints")
            }
            LifecycleError::Sql(source) => {
                error!("lifecycle storage error: {source}");

                Self::internal()
            }
            LifecycleError::Forbidden { .. }
            | LifecycleError::NotFound
            | LifecycleError::Conflict { .. } => Self::new(code, message),
        }
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        record_error_code(self.code.as_str());

        res.status_code(self.status_code());
        res.render(Json(self.body));
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        for (status, description) in [
            (StatusCode::UNAUTHORIZED, "Missing or malformed actor claims"),
            (StatusCode::FORBIDDEN, "Actor lacks the role or location scope"),
            (StatusCode::NOT_FOUND, "Not found or outside the actor's scope"),
            (StatusCode::UNPROCESSABLE_ENTITY, "Validation failed"),
            (StatusCode::CONFLICT, "Invalid transition or conflicting write"),
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        ] {
            operation.responses.insert(
                status.as_str(),
                oapi::Response::new(description)
                    .add_content("application/json", ApiErrorBody::to_schema(components)),
            );
        }
    }
}

/// Render extractor failures as `validation_failed` instead of a bare 400.
#[salvo::handler]
pub(crate) async fn malformed_input(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    ctrl.call_next(req, depot, res).await;

    let ResBody::Error(status) = &res.body else {
        return;
    };

    if status.code != StatusCode::BAD_REQUEST {
        return;
    }

    let Some(parse_error) = status
        .cause
        .as_deref()
        .and_then(|cause| cause.downcast_ref::<ParseError>())
    else {
        return;
    };

    let field = malformed_field(parse_error);

    debug!("malformed {field}: {parse_error}");

    res.render(ApiError::invalid_fields([field.as_str()]));
}

/// Input field a parse error points at, `body` when it cannot be told.
fn malformed_field(parse_error: &ParseError) -> String {
    let message = parse_error.to_string();

    if let Some(arg) = message
        .strip_prefix("other error: path parameter ")
        .and_then(|rest| rest.split_whitespace().next())
    {
        return format!("{arg}_id");
    }

    ["missing field `", "unknown field `", "duplicate field `"]
        .iter()
        .find_map(|prefix| message.split_once(prefix))
        .and_then(|(_, rest)| rest.split_once('`'))
        .map_or_else(|| "body".to_string(), |(field, _)| field.to_string())
}

/// Map a lifecycle result to the API shape, counting its outcome.
pub(crate) fn observed<T>(
    workflow: &'static str,
    result: Result<T, LifecycleError>,
) -> Result<T, ApiError> {
    let outcome = match &result {
        Ok(_) => "success",
        Err(error) => error.code().as_str(),
    };

    observe_lifecycle_outcome(workflow, outcome);

    result.map_err(ApiError::from)
}
