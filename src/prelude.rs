//! Mailroom prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    actor::{Actor, Role, UnknownRole},
    aliases::{
        AliasDecision, AliasSuggestionStatus, AliasType, DecisionAction, authorize_review,
        normalize_alias, resolve_normalized_alias, validate_suggested_alias,
    },
    errors::{ErrorCode, FieldNames, GuardError},
    mail_items::{MailItemEvent, MailItemStatus, PackageType, StateViolation, UnknownStatus},
    requests::{
        Capability, CompletionMetadata, CompletionPayload, RequestScope, RequestStatus,
        RequestType,
        guards::{authorize_creation, authorize_customer_cancellation, authorize_transition},
    },
    uuids::{
        ActorUuid, AliasSuggestionUuid, AuditRecordUuid, CompanyAliasUuid, CompanyUuid,
        LocationUuid, MailItemUuid, MailRequestUuid, MailboxUuid, TenantUuid, TypedUuid,
    },
};
