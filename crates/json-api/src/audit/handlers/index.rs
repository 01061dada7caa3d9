//! List Audit Records Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use mailroom_app::domain::audit::{data::ResourceType, records::AuditRecord};

use crate::{errors::ApiError, extensions::*, state::State};

/// Audit Record Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AuditRecordResponse {
    /// The unique identifier of the record
    pub uuid: Uuid,

    /// Acting identity
    pub actor_id: Uuid,

    /// Actor roles at the time of the action
    pub actor_roles: Vec<String>,

    /// Dotted event name
    pub action: String,

    /// `mail_item`, `mail_request` or `alias_suggestion`
    pub resource_type: String,

    /// Target entity
    pub resource_id: Uuid,

    /// `success` or `failure`
    pub result: String,

    /// Structured before/after payload
    #[salvo(schema(value_type = Object))]
    pub payload: Value,

    /// When the action happened
    pub created_at: String,
}

impl From<AuditRecord> for AuditRecordResponse {
    fn from(record: AuditRecord) -> Self {
        Self {
            uuid: record.uuid.into_uuid(),
            actor_id: record.actor_uuid.into_uuid(),
            actor_roles: record.actor_roles,
            action: record.action,
            resource_type: record.resource_type.as_str().to_string(),
            resource_id: record.resource_uuid,
            result: record.result.as_str().to_string(),
            payload: record.payload,
            created_at: record.created_at.to_string(),
        }
    }
}

/// List Audit Records Handler
///
/// Returns the audit trail of one entity, oldest first. Tenant admins only.
#[endpoint(
    tags("audit"),
    summary = "List Audit Records",
    status_codes(200, 401, 403, 422, 500)
)]
pub(crate) async fn handler(
    resource_type: QueryParam<String, true>,
    resource_id: QueryParam<Uuid, true>,
    depot: &mut Depot,
) -> Result<Json<Vec<AuditRecordResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let resource_type: ResourceType = resource_type.into_inner().parse_field("resource_type")?;

    let records = state
        .app
        .audit
        .list_audit_records(actor, resource_type, resource_id.into_inner())
        .await?;

    Ok(Json(
        records.into_iter().map(AuditRecordResponse::from).collect(),
    ))
}
