//! Alias suggestions service.

use async_trait::async_trait;
use mockall::automock;
use serde_json::json;
use tracing::{Span, info};

use mailroom::{
    actor::Actor,
    aliases::{
        AliasDecision, DecisionAction, authorize_review, normalize_alias,
        resolve_normalized_alias, validate_suggested_alias,
    },
    errors::GuardError,
    uuids::{AliasSuggestionUuid, CompanyAliasUuid},
};

use crate::{
    database::Db,
    domain::{
        aliases::{
            data::{NewAliasSuggestion, NewCompanyAlias},
            records::{AliasDecisionOutcome, AliasSuggestionRecord, CompanyAliasRecord},
            repositories::{
                PgAliasSuggestionsRepository, PgCompanyAliasesRepository, SuggestionDecision,
            },
        },
        audit::data::{AuditSubject, NewAuditRecord, ResourceType},
        lifecycle::{Coordinator, LifecycleError},
        tenants::repositories::{PgCompaniesRepository, PgMailboxesRepository},
    },
};

const SUBMITTED: &str = "alias_suggestion.submitted";

const ALREADY_DECIDED: LifecycleError = LifecycleError::Conflict {
    reason: "alias suggestion has already been decided",
};

const ALIAS_EXISTS: LifecycleError = LifecycleError::Conflict {
    reason: "company already has an active alias with this text",
};

const fn decision_audit_action(action: DecisionAction) -> &'static str {
    match action {
        DecisionAction::Approve => "alias_suggestion.approved",
        DecisionAction::Reject => "alias_suggestion.rejected",
    }
}

#[derive(Debug, Clone)]
pub struct PgAliasesService {
    coordinator: Coordinator,
    suggestions: PgAliasSuggestionsRepository,
    aliases: PgCompanyAliasesRepository,
    companies: PgCompaniesRepository,
    mailboxes: PgMailboxesRepository,
}

impl PgAliasesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            coordinator: Coordinator::new(db),
            suggestions: PgAliasSuggestionsRepository::new(),
            aliases: PgCompanyAliasesRepository::new(),
            companies: PgCompaniesRepository::new(),
            mailboxes: PgMailboxesRepository::new(),
        }
    }

    async fn try_submit(
        &self,
        actor: &Actor,
        mut suggestion: NewAliasSuggestion,
    ) -> Result<AliasSuggestionRecord, LifecycleError> {
        authorize_review(actor, suggestion.location_uuid)?;

        suggestion.suggested_alias = validate_suggested_alias(&suggestion.suggested_alias)?;
        suggestion.normalized_alias = suggestion
            .normalized_alias
            .as_deref()
            .map(normalize_alias)
            .filter(|normalized| !normalized.is_empty());

        let mut tx = self.coordinator.begin(actor).await?;

        let record = self
            .suggestions
            .create_suggestion(&mut tx, actor.tenant, actor.uuid, suggestion)
            .await?;

        self.coordinator
            .commit(
                tx,
                NewAuditRecord::success(
                    actor,
                    SUBMITTED,
                    AuditSubject::new(ResourceType::AliasSuggestion, record.uuid),
                    json!({
                        "location_uuid": record.location_uuid,
                        "suggested_alias": record.suggested_alias,
                        "company_uuid": record.company_uuid,
                    }),
                ),
            )
            .await?;

        Ok(record)
    }

    async fn try_decide(
        &self,
        actor: &Actor,
        uuid: AliasSuggestionUuid,
        decision: AliasDecision,
    ) -> Result<AliasDecisionOutcome, LifecycleError> {
        let mut tx = self.coordinator.begin(actor).await?;

        let suggestion = self
            .suggestions
            .get_suggestion(&mut tx, actor.tenant, uuid)
            .await?;

        // Conflict outranks scope: a decided suggestion reports as decided to anyone.
        suggestion.status.require_pending()?;

        authorize_review(actor, suggestion.location_uuid)?;

        let action = decision.action();
        let status = decision.resulting_status();
        let notes = decision.decision_notes();

        let (decided, company_alias) = match decision {
            AliasDecision::Approve {
                company,
                alias_type,
                ..
            } => {
                self.companies
                    .get_company(&mut tx, actor.tenant, company)
                    .await?;

                let mailbox = self
                    .mailboxes
                    .find_company_mailbox(&mut tx, actor.tenant, company)
                    .await?;

                let alias_uuid = CompanyAliasUuid::new();

                // The alias row is inserted after the guarded write; the
                // suggestion's reference to it is checked at commit.
                let decided = self
                    .suggestions
                    .decide_suggestion(
                        &mut tx,
                        actor.tenant,
                        uuid,
                        SuggestionDecision {
                            status,
                            decided_by: actor.uuid,
                            notes,
                            company_uuid: Some(company),
                            company_alias_uuid: Some(alias_uuid),
                        },
                    )
                    .await?
                    .ok_or(ALREADY_DECIDED)?;

                let alias = self
                    .aliases
                    .create_company_alias(
                        &mut tx,
                        actor.tenant,
                        NewCompanyAlias {
                            uuid: alias_uuid,
                            company_uuid: company,
                            mailbox_uuid: mailbox.map(|mailbox| mailbox.uuid),
                            alias_suggestion_uuid: uuid,
                            alias_name: decided.suggested_alias.clone(),
                            normalized_alias: resolve_normalized_alias(
                                &decided.suggested_alias,
                                decided.normalized_alias.as_deref(),
                            ),
                            alias_type,
                            created_by: actor.uuid,
                        },
                    )
                    .await
                    .map_err(|error| {
                        if LifecycleError::is_unique_violation(&error) {
                            ALIAS_EXISTS
                        } else {
                            error.into()
                        }
                    })?;

                (decided, Some(alias))
            }
            AliasDecision::Reject { .. } => {
                let decided = self
                    .suggestions
                    .decide_suggestion(
                        &mut tx,
                        actor.tenant,
                        uuid,
                        SuggestionDecision {
                            status,
                            decided_by: actor.uuid,
                            notes,
                            company_uuid: None,
                            company_alias_uuid: None,
                        },
                    )
                    .await?
                    .ok_or(ALREADY_DECIDED)?;

                (decided, None)
            }
        };

        self.coordinator
            .commit(
                tx,
                NewAuditRecord::success(
                    actor,
                    decision_audit_action(action),
                    AuditSubject::new(ResourceType::AliasSuggestion, uuid),
                    json!({
                        "action": action.as_str(),
                        "previous_status": suggestion.status.as_str(),
                        "new_status": decided.status.as_str(),
                        "company_uuid": decided.company_uuid,
                        "company_alias_uuid": company_alias.as_ref().map(|alias| alias.uuid),
                        "notes": decided.notes,
                    }),
                ),
            )
            .await?;

        Ok(AliasDecisionOutcome {
            action,
            suggestion: decided,
            company_alias,
        })
    }
}

#[async_trait]
impl AliasesService for PgAliasesService {
    #[tracing::instrument(
        name = "aliases.service.submit_suggestion",
        skip(self, actor, suggestion),
        fields(
            tenant_uuid = %actor.tenant,
            actor_uuid = %actor.uuid,
            alias_suggestion_uuid = %suggestion.uuid,
            location_uuid = %suggestion.location_uuid
        ),
        err
    )]
    async fn submit_suggestion(
        &self,
        actor: &Actor,
        suggestion: NewAliasSuggestion,
    ) -> Result<AliasSuggestionRecord, LifecycleError> {
        let subject = AuditSubject::new(ResourceType::AliasSuggestion, suggestion.uuid);

        let result = self.try_submit(actor, suggestion).await;

        let record = self
            .coordinator
            .settle(actor, SUBMITTED, subject, result)
            .await?;

        info!(alias_suggestion_uuid = %record.uuid, "submitted alias suggestion");

        Ok(record)
    }

    #[tracing::instrument(
        name = "aliases.service.get_suggestion",
        skip(self, actor),
        fields(tenant_uuid = %actor.tenant, actor_uuid = %actor.uuid, alias_suggestion_uuid = %uuid),
        err
    )]
    async fn get_suggestion(
        &self,
        actor: &Actor,
        uuid: AliasSuggestionUuid,
    ) -> Result<AliasSuggestionRecord, LifecycleError> {
        let mut tx = self.coordinator.begin(actor).await?;

        let suggestion = self
            .suggestions
            .get_suggestion(&mut tx, actor.tenant, uuid)
            .await?;

        tx.commit().await?;

        if !(actor.is_staff() && actor.covers_location(suggestion.location_uuid)) {
            return Err(LifecycleError::NotFound);
        }

        Ok(suggestion)
    }

    #[tracing::instrument(
        name = "aliases.service.decide",
        skip(self, actor, decision),
        fields(
            tenant_uuid = %actor.tenant,
            actor_uuid = %actor.uuid,
            alias_suggestion_uuid = %uuid,
            action = %decision.action().as_str(),
            company_alias_uuid = tracing::field::Empty
        ),
        err
    )]
    async fn decide(
        &self,
        actor: &Actor,
        uuid: AliasSuggestionUuid,
        decision: AliasDecision,
    ) -> Result<AliasDecisionOutcome, LifecycleError> {
        let action = decision.action();

        let result = self.try_decide(actor, uuid, decision).await;

        let outcome = self
            .coordinator
            .settle(
                actor,
                decision_audit_action(action),
                AuditSubject::new(ResourceType::AliasSuggestion, uuid),
                result,
            )
            .await?;

        if let Some(alias) = &outcome.company_alias {
            Span::current().record("company_alias_uuid", tracing::field::display(alias.uuid));
        }

        info!(status = %outcome.suggestion.status.as_str(), "decided alias suggestion");

        Ok(outcome)
    }

    #[tracing::instrument(
        name = "aliases.service.match_alias",
        skip(self, actor, text),
        fields(tenant_uuid = %actor.tenant, actor_uuid = %actor.uuid, matches = tracing::field::Empty),
        err
    )]
    async fn match_alias(
        &self,
        actor: &Actor,
        text: &str,
    ) -> Result<Vec<CompanyAliasRecord>, LifecycleError> {
        if !actor.is_staff() {
            return Err(LifecycleError::Forbidden {
                action: "match company aliases",
            });
        }

        let normalized = normalize_alias(text);

        if normalized.is_empty() {
            return Err(GuardError::invalid_fields(["text"]).into());
        }

        let mut tx = self.coordinator.begin(actor).await?;

        let aliases = self
            .aliases
            .match_company_aliases(&mut tx, actor.tenant, &normalized)
            .await?;

        tx.commit().await?;

        Span::current().record("matches", aliases.len());

        Ok(aliases)
    }
}

#[automock]
#[async_trait]
/// Review workflow for observed company-name variants.
pub trait AliasesService: Send + Sync {
    /// Submit observed text for review.
    async fn submit_suggestion(
        &self,
        actor: &Actor,
        suggestion: NewAliasSuggestion,
    ) -> Result<AliasSuggestionRecord, LifecycleError>;

    /// Retrieve a suggestion visible to `actor`.
    async fn get_suggestion(
        &self,
        actor: &Actor,
        uuid: AliasSuggestionUuid,
    ) -> Result<AliasSuggestionRecord, LifecycleError>;

    /// Approve or reject a pending suggestion, at most once.
    async fn decide(
        &self,
        actor: &Actor,
        uuid: AliasSuggestionUuid,
        decision: AliasDecision,
    ) -> Result<AliasDecisionOutcome, LifecycleError>;

    /// Active aliases matching observed text after normalization.
    async fn match_alias(
        &self,
        actor: &Actor,
        text: &str,
    ) -> Result<Vec<CompanyAliasRecord>, LifecycleError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use mailroom::{
        aliases::{AliasSuggestionStatus, AliasType},
        uuids::{CompanyUuid, LocationUuid},
    };

    use crate::{
        domain::audit::{AuditService, data::AuditResult},
        test::{TestContext, helpers},
    };

    use super::*;

    fn approve(company: CompanyUuid) -> AliasDecision {
        AliasDecision::Approve {
            company,
            alias_type: AliasType::OcrVariant,
            notes: None,
        }
    }

    fn reject() -> AliasDecision {
        AliasDecision::Reject {
            reason: "not a tenant".to_string(),
            notes: Some("checked the roster".to_string()),
        }
    }

    #[tokio::test]
    async fn approval_creates_exactly_one_alias() -> TestResult {
        let ctx = TestContext::new().await;
        let suggestion = helpers::submit_suggestion(&ctx, "  ACME   Widgets ").await?;

        let outcome = ctx
            .aliases
            .decide(&ctx.staff(), suggestion.uuid, approve(ctx.company_uuid))
            .await?;

        assert_eq!(outcome.action, DecisionAction::Approve);
        assert_eq!(outcome.suggestion.status, AliasSuggestionStatus::Approved);
        assert_eq!(outcome.suggestion.decided_by, Some(ctx.staff().uuid));

        let alias = outcome.company_alias.ok_or("approval should create an alias")?;

        assert_eq!(alias.alias_name, "ACME   Widgets");
        assert_eq!(alias.normalized_alias, "acme widgets");
        assert_eq!(alias.company_uuid, ctx.company_uuid);
        assert_eq!(alias.mailbox_uuid, Some(ctx.mailbox_uuid));
        assert_eq!(outcome.suggestion.company_alias_uuid, Some(alias.uuid));

        let matches = ctx.aliases.match_alias(&ctx.staff(), "acme WIDGETS").await?;

        assert_eq!(matches.len(), 1);

        let audit = ctx
            .audit
            .list_audit_records(
                &ctx.admin(),
                ResourceType::AliasSuggestion,
                suggestion.uuid.into_uuid(),
            )
            .await?;

        assert!(
            audit.iter().any(|record| {
                record.action == "alias_suggestion.approved"
                    && record.payload["company_alias_uuid"] == json!(alias.uuid)
            }),
            "expected an approval audit record, got {audit:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejection_creates_no_alias_and_stores_reason() -> TestResult {
        let ctx = TestContext::new().await;
        let suggestion = helpers::submit_suggestion(&ctx, "Acme Widgits").await?;

        let outcome = ctx
            .aliases
            .decide(&ctx.staff(), suggestion.uuid, reject())
            .await?;

        assert_eq!(outcome.suggestion.status, AliasSuggestionStatus::Rejected);
        assert!(outcome.company_alias.is_none());
        assert_eq!(
            outcome.suggestion.notes.as_deref(),
            Some("not a tenant - checked the roster")
        );

        let matches = ctx.aliases.match_alias(&ctx.staff(), "acme widgits").await?;

        assert!(matches.is_empty(), "rejection created {matches:?}");

        Ok(())
    }

    #[tokio::test]
    async fn replaying_a_decision_conflicts() -> TestResult {
        let ctx = TestContext::new().await;
        let suggestion = helpers::submit_suggestion(&ctx, "Acme Corp").await?;

        ctx.aliases
            .decide(&ctx.staff(), suggestion.uuid, approve(ctx.company_uuid))
            .await?;

        let replay = ctx
            .aliases
            .decide(&ctx.staff(), suggestion.uuid, approve(ctx.company_uuid))
            .await;

        assert!(
            matches!(
                replay,
                Err(LifecycleError::Conflict {
                    reason: "alias suggestion has already been decided"
                })
            ),
            "expected Conflict, got {replay:?}"
        );

        let audit = ctx
            .audit
            .list_audit_records(
                &ctx.admin(),
                ResourceType::AliasSuggestion,
                suggestion.uuid.into_uuid(),
            )
            .await?;

        assert_eq!(
            audit
                .iter()
                .filter(|record| record.result == AuditResult::Failure)
                .count(),
            1
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_decisions_apply_exactly_once() -> TestResult {
        let ctx = TestContext::new().await;
        let suggestion = helpers::submit_suggestion(&ctx, "Acme Holdings").await?;

        let staff = ctx.staff();
        let admin = ctx.admin();

        let (approved, rejected) = tokio::join!(
            ctx.aliases
                .decide(&staff, suggestion.uuid, approve(ctx.company_uuid)),
            ctx.aliases.decide(&admin, suggestion.uuid, reject()),
        );

        assert!(
            approved.is_ok() != rejected.is_ok(),
            "exactly one decision should win: {approved:?} / {rejected:?}"
        );

        let loser = if approved.is_ok() {
            rejected.err()
        } else {
            approved.err()
        };

        assert!(
            matches!(loser, Some(LifecycleError::Conflict { .. })),
            "expected the loser to conflict, got {loser:?}"
        );

        let stored = ctx.aliases.get_suggestion(&admin, suggestion.uuid).await?;
        let matches = ctx.aliases.match_alias(&admin, "acme holdings").await?;

        match stored.status {
            AliasSuggestionStatus::Approved => assert_eq!(matches.len(), 1),
            AliasSuggestionStatus::Rejected => assert!(matches.is_empty(), "got {matches:?}"),
            AliasSuggestionStatus::Pending => {
                return Err("suggestion is still pending".into());
            }
        }

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_approvals_create_one_alias() -> TestResult {
        let ctx = TestContext::new().await;
        let suggestion = helpers::submit_suggestion(&ctx, "Acme Logistics").await?;

        let staff = ctx.staff();
        let admin = ctx.admin();

        let (first, second) = tokio::join!(
            ctx.aliases
                .decide(&staff, suggestion.uuid, approve(ctx.company_uuid)),
            ctx.aliases
                .decide(&admin, suggestion.uuid, approve(ctx.company_uuid)),
        );

        assert_eq!(
            [first.is_ok(), second.is_ok()]
                .into_iter()
                .filter(|ok| *ok)
                .count(),
            1
        );

        let matches = ctx.aliases.match_alias(&admin, "acme logistics").await?;

        assert_eq!(matches.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn staff_outside_the_location_cannot_decide() -> TestResult {
        let ctx = TestContext::new().await;
        let suggestion = helpers::submit_suggestion(&ctx, "Acme Labs").await?;

        let outsider = ctx.staff_at(LocationUuid::new());

        let result = ctx
            .aliases
            .decide(&outsider, suggestion.uuid, approve(ctx.company_uuid))
            .await;

        assert!(
            matches!(result, Err(LifecycleError::Forbidden { .. })),
            "expected Forbidden, got {result:?}"
        );

        let stored = ctx.aliases.get_suggestion(&ctx.staff(), suggestion.uuid).await?;

        assert_eq!(stored.status, AliasSuggestionStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn decided_suggestions_conflict_for_staff_outside_the_location() -> TestResult {
        let ctx = TestContext::new().await;
        let suggestion = helpers::submit_suggestion(&ctx, "Acme Freight").await?;

        ctx.aliases
            .decide(&ctx.staff(), suggestion.uuid, reject())
            .await?;

        let outsider = ctx.staff_at(LocationUuid::new());

        let result = ctx
            .aliases
            .decide(&outsider, suggestion.uuid, approve(ctx.company_uuid))
            .await;

        assert!(
            matches!(
                result,
                Err(LifecycleError::Conflict {
                    reason: "alias suggestion has already been decided"
                })
            ),
            "expected Conflict, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn approval_for_unknown_company_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let suggestion = helpers::submit_suggestion(&ctx, "Acme Unknown").await?;

        let result = ctx
            .aliases
            .decide(&ctx.staff(), suggestion.uuid, approve(CompanyUuid::new()))
            .await;

        assert!(
            matches!(result, Err(LifecycleError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        let stored = ctx.aliases.get_suggestion(&ctx.staff(), suggestion.uuid).await?;

        assert_eq!(stored.status, AliasSuggestionStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_alias_aborts_the_approval() -> TestResult {
        let ctx = TestContext::new().await;
        let first = helpers::submit_suggestion(&ctx, "Acme Inc").await?;
        let second = helpers::submit_suggestion(&ctx, "ACME  inc").await?;

        ctx.aliases
            .decide(&ctx.staff(), first.uuid, approve(ctx.company_uuid))
            .await?;

        let result = ctx
            .aliases
            .decide(&ctx.staff(), second.uuid, approve(ctx.company_uuid))
            .await;

        assert!(
            matches!(result, Err(LifecycleError::Conflict { .. })),
            "expected Conflict, got {result:?}"
        );

        let stored = ctx.aliases.get_suggestion(&ctx.staff(), second.uuid).await?;

        assert_eq!(stored.status, AliasSuggestionStatus::Pending);
        assert!(stored.company_alias_uuid.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn blank_suggestions_are_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let result = helpers::submit_suggestion(&ctx, "   ").await;

        assert!(
            matches!(result, Err(LifecycleError::ValidationFailed { .. })),
            "expected ValidationFailed, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn customers_cannot_match_aliases() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx.aliases.match_alias(&ctx.customer(), "acme").await;

        assert!(
            matches!(result, Err(LifecycleError::Forbidden { .. })),
            "expected Forbidden, got {result:?}"
        );

        Ok(())
    }
}
