//! Audit Records

use jiff::Timestamp;
use serde_json::Value;
use uuid::Uuid;

use mailroom::uuids::{ActorUuid, AuditRecordUuid, TenantUuid};

use crate::domain::audit::data::{AuditResult, ResourceType};

/// Audit Record
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub uuid: AuditRecordUuid,
    pub tenant_uuid: TenantUuid,
    pub actor_uuid: ActorUuid,
    pub actor_roles: Vec<String>,
    pub action: String,
    pub resource_type: ResourceType,
    pub resource_uuid: Uuid,
    pub result: AuditResult,
    pub payload: Value,
    pub created_at: Timestamp,
}
