//! Alias Suggestions
//!
//! Staff propose that an OCR-observed address string is another name for a
//! tenant company. A suggestion is decided exactly once: approval creates a
//! routing rule (a company alias), rejection only annotates the suggestion.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    actor::Actor,
    errors::GuardError,
    mail_items::UnknownStatus,
    uuids::{CompanyUuid, LocationUuid},
};

/// Status of an alias suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasSuggestionStatus {
    /// Awaiting a decision.
    Pending,

    /// Approved; a company alias exists.
    Approved,

    /// Rejected with a reason.
    Rejected,
}

impl AliasSuggestionStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Require the suggestion to still be decidable.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Conflict`] once a decision was recorded.
    pub const fn require_pending(self) -> Result<(), GuardError> {
        match self {
            Self::Pending => Ok(()),
            Self::Approved | Self::Rejected => Err(GuardError::Conflict {
                reason: "alias suggestion has already been decided",
            }),
        }
    }
}

impl Display for AliasSuggestionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for AliasSuggestionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Kind of routing rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasType {
    /// A variant produced by OCR.
    #[default]
    OcrVariant,

    /// "Doing business as" name.
    Dba,

    /// Abbreviated form.
    Abbreviation,

    /// Common misspelling.
    Misspelling,

    /// Anything else.
    Other,
}

impl AliasType {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OcrVariant => "ocr_variant",
            Self::Dba => "dba",
            Self::Abbreviation => "abbreviation",
            Self::Misspelling => "misspelling",
            Self::Other => "other",
        }
    }
}

impl FromStr for AliasType {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ocr_variant" => Ok(Self::OcrVariant),
            "dba" => Ok(Self::Dba),
            "abbreviation" => Ok(Self::Abbreviation),
            "misspelling" => Ok(Self::Misspelling),
            "other" => Ok(Self::Other),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Requested decision verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionAction {
    /// Create a routing rule.
    Approve,

    /// Decline with a reason.
    Reject,
}

impl DecisionAction {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

impl FromStr for DecisionAction {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A fully validated decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasDecision {
    /// Approve, mapping the alias to `company`.
    Approve {
        /// Target company.
        company: CompanyUuid,

        /// Kind of routing rule to create.
        alias_type: AliasType,

        /// Reviewer notes.
        notes: Option<String>,
    },

    /// Reject for `reason`.
    Reject {
        /// Why the suggestion was declined.
        reason: String,

        /// Reviewer notes.
        notes: Option<String>,
    },
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl AliasDecision {
    /// Build a decision from loosely-typed request fields.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::ValidationFailed`] naming `company_id` for an
    /// approval without a company, or `reject_reason` for a rejection without
    /// a (non-blank) reason.
    pub fn from_request(
        action: DecisionAction,
        company: Option<CompanyUuid>,
        alias_type: Option<AliasType>,
        reject_reason: Option<String>,
        notes: Option<String>,
    ) -> Result<Self, GuardError> {
        let notes = present(notes);

        match action {
            DecisionAction::Approve => {
                let company = company.ok_or_else(|| GuardError::invalid_fields(["company_id"]))?;

                Ok(Self::Approve {
                    company,
                    alias_type: alias_type.unwrap_or_default(),
                    notes,
                })
            }
            DecisionAction::Reject => {
                let reason = present(reject_reason)
                    .ok_or_else(|| GuardError::invalid_fields(["reject_reason"]))?;

                Ok(Self::Reject { reason, notes })
            }
        }
    }

    /// Verb of this decision.
    #[must_use]
    pub const fn action(&self) -> DecisionAction {
        match self {
            Self::Approve { .. } => DecisionAction::Approve,
            Self::Reject { .. } => DecisionAction::Reject,
        }
    }

    /// Status the suggestion ends in.
    #[must_use]
    pub const fn resulting_status(&self) -> AliasSuggestionStatus {
        match self {
            Self::Approve { .. } => AliasSuggestionStatus::Approved,
            Self::Reject { .. } => AliasSuggestionStatus::Rejected,
        }
    }

    /// Notes persisted on the suggestion.
    ///
    /// A rejection stores its reason, followed by any notes.
    #[must_use]
    pub fn decision_notes(&self) -> Option<String> {
        match self {
            Self::Approve { notes, .. } => notes.clone(),
            Self::Reject { reason, notes } => Some(match notes {
                Some(notes) => format!("{reason} - {notes}"),
                None => reason.clone(),
            }),
        }
    }
}

/// Normalize observed alias text for matching.
///
/// Trims, lower-cases and collapses internal whitespace runs to one space.
#[must_use]
pub fn normalize_alias(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pick the normalized alias to store: the supplied form if non-blank,
/// otherwise one derived from `suggested_alias`.
#[must_use]
pub fn resolve_normalized_alias(suggested_alias: &str, normalized: Option<&str>) -> String {
    normalized
        .map(str::trim)
        .filter(|normalized| !normalized.is_empty())
        .map_or_else(|| normalize_alias(suggested_alias), normalize_alias)
}

/// Validate observed alias text for a new suggestion.
///
/// # Errors
///
/// Returns [`GuardError::ValidationFailed`] naming `suggested_alias` when the
/// text is blank.
pub fn validate_suggested_alias(text: &str) -> Result<String, GuardError> {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return Err(GuardError::invalid_fields(["suggested_alias"]));
    }

    Ok(trimmed.to_string())
}

/// Decide whether `actor` may decide or submit suggestions at `location`.
///
/// # Errors
///
/// Returns [`GuardError::Forbidden`] for non-staff and for staff whose
/// location scope excludes `location`.
pub fn authorize_review(actor: &Actor, location: LocationUuid) -> Result<(), GuardError> {
    actor.require_staff_at(location, "review alias suggestions at this location")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{
        actor::Role,
        uuids::{ActorUuid, TenantUuid},
    };

    #[test]
    fn approval_requires_a_company() {
        let result = AliasDecision::from_request(DecisionAction::Approve, None, None, None, None);

        assert_eq!(result, Err(GuardError::invalid_fields(["company_id"])));
    }

    #[test]
    fn approval_defaults_to_ocr_variant() -> TestResult {
        let company = CompanyUuid::new();
        let decision =
            AliasDecision::from_request(DecisionAction::Approve, Some(company), None, None, None)?;

        assert_eq!(
            decision,
            AliasDecision::Approve {
                company,
                alias_type: AliasType::OcrVariant,
                notes: None,
            }
        );
        assert_eq!(decision.resulting_status(), AliasSuggestionStatus::Approved);

        Ok(())
    }

    #[test]
    fn rejection_requires_a_reason() {
        let result = AliasDecision::from_request(
            DecisionAction::Reject,
            None,
            None,
            Some("  ".to_string()),
            Some("looked wrong".to_string()),
        );

        assert_eq!(result, Err(GuardError::invalid_fields(["reject_reason"])));
    }

    #[test]
    fn rejection_notes_join_reason_and_notes() -> TestResult {
        let decision = AliasDecision::from_request(
            DecisionAction::Reject,
            None,
            None,
            Some("not a company".to_string()),
            Some("street name".to_string()),
        )?;

        assert_eq!(
            decision.decision_notes().as_deref(),
            Some("not a company - street name")
        );

        Ok(())
    }

    #[test]
    fn decided_suggestions_conflict() {
        assert!(AliasSuggestionStatus::Pending.require_pending().is_ok());

        for status in [
            AliasSuggestionStatus::Approved,
            AliasSuggestionStatus::Rejected,
        ] {
            assert!(
                matches!(status.require_pending(), Err(GuardError::Conflict { .. })),
                "{status}"
            );
        }
    }

    #[test]
    fn normalization_trims_and_lowercases() {
        assert_eq!(normalize_alias("  ACME   Widgets\tLLC "), "acme widgets llc");
        assert_eq!(
            resolve_normalized_alias("ACME Widgets", Some("   ")),
            "acme widgets"
        );
        assert_eq!(resolve_normalized_alias("ACME", Some("Acme Co")), "acme co");
    }

    #[test]
    fn blank_suggestions_are_rejected() {
        assert_eq!(
            validate_suggested_alias("   "),
            Err(GuardError::invalid_fields(["suggested_alias"]))
        );
    }

    #[test]
    fn review_is_location_scoped() {
        let location = LocationUuid::new();
        let staff = Actor::new(ActorUuid::new(), TenantUuid::new())
            .with_role(Role::OperatorStaff)
            .with_location(LocationUuid::new());

        assert!(matches!(
            authorize_review(&staff, location),
            Err(GuardError::Forbidden { .. })
        ));
        assert_eq!(
            authorize_review(&staff.clone().with_location(location), location),
            Ok(())
        );
    }
}
