//! Healthcheck Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{errors::ApiError, extensions::*, state::State};

/// Individual readiness checks
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthChecks {
    /// Database answered
    pub database: bool,

    /// Connected role is subject to row-level security
    pub tenant_isolation: bool,
}

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthResponse {
    /// `ok` or `unavailable`
    pub status: String,

    /// Build version
    pub version: String,

    /// Seconds since startup
    pub uptime_seconds: i64,

    /// Readiness checks
    pub checks: HealthChecks,
}

/// Healthcheck handler
///
/// Reports readiness: 200 while the database answers and enforces tenant
/// isolation, 503 otherwise.
#[endpoint(
    tags("health"),
    summary = "Health check endpoint",
    status_codes(200, 503)
)]
pub(crate) async fn handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<HealthResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let readiness = state.app.health.readiness().await;

    let status = if readiness.is_ready() {
        "ok"
    } else {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);

        "unavailable"
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime().as_secs(),
        checks: HealthChecks {
            database: readiness.database,
            tenant_isolation: readiness.tenant_isolation,
        },
    }))
}
