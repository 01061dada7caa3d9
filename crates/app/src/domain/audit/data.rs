//! Audit Data

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde_json::Value;
use uuid::Uuid;

use mailroom::{
    actor::Actor,
    mail_items::UnknownStatus,
    uuids::{ActorUuid, AuditRecordUuid, TenantUuid},
};

/// Kind of entity an audit record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    /// A mail item.
    MailItem,

    /// A mail request.
    MailRequest,

    /// An alias suggestion.
    AliasSuggestion,
}

impl ResourceType {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MailItem => "mail_item",
            Self::MailRequest => "mail_request",
            Self::AliasSuggestion => "alias_suggestion",
        }
    }
}

impl Display for ResourceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mail_item" => Ok(Self::MailItem),
            "mail_request" => Ok(Self::MailRequest),
            "alias_suggestion" => Ok(Self::AliasSuggestion),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Outcome recorded for an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuditResult {
    /// The mutation was applied.
    Success,

    /// The action was denied or lost a race.
    Failure,
}

impl AuditResult {
    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl FromStr for AuditResult {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// The entity an action targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditSubject {
    /// Entity kind.
    pub resource_type: ResourceType,

    /// Entity id.
    pub resource_uuid: Uuid,
}

impl AuditSubject {
    /// Subject of kind `resource_type` identified by `uuid`.
    pub fn new(resource_type: ResourceType, uuid: impl Into<Uuid>) -> Self {
        Self {
            resource_type,
            resource_uuid: uuid.into(),
        }
    }
}

/// New Audit Record Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditRecord {
    /// UUID to assign to the record.
    pub uuid: AuditRecordUuid,

    /// Tenant scope.
    pub tenant_uuid: TenantUuid,

    /// Acting identity.
    pub actor_uuid: ActorUuid,

    /// Actor roles at the time of the action.
    pub actor_roles: Vec<String>,

    /// Dotted event name, e.g. `request.status_changed`.
    pub action: &'static str,

    /// Target entity.
    pub subject: AuditSubject,

    /// Outcome.
    pub result: AuditResult,

    /// Structured before/after or metadata payload.
    pub payload: Value,
}

impl NewAuditRecord {
    /// Record of a successful mutation.
    #[must_use]
    pub fn success(actor: &Actor, action: &'static str, subject: AuditSubject, payload: Value) -> Self {
        Self::build(actor, action, subject, AuditResult::Success, payload)
    }

    /// Record of a denied or lost attempt.
    #[must_use]
    pub fn failure(actor: &Actor, action: &'static str, subject: AuditSubject, payload: Value) -> Self {
        Self::build(actor, action, subject, AuditResult::Failure, payload)
    }

    fn build(
        actor: &Actor,
        action: &'static str,
        subject: AuditSubject,
        result: AuditResult,
        payload: Value,
    ) -> Self {
        Self {
            uuid: AuditRecordUuid::new(),
            tenant_uuid: actor.tenant,
            actor_uuid: actor.uuid,
            actor_roles: actor.role_names(),
            action,
            subject,
            result,
            payload,
        }
    }
}
