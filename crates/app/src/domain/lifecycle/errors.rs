//! Lifecycle errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use mailroom::{
    errors::{ErrorCode, FieldNames, GuardError},
    mail_items::StateViolation,
};

/// Error shared by every lifecycle workflow.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The actor lacks the role or location scope.
    #[error("not permitted to {action}")]
    Forbidden {
        /// What was attempted.
        action: &'static str,
    },

    /// Entity absent or outside the actor's scope.
    #[error("resource not found")]
    NotFound,

    /// Missing or malformed input fields.
    #[error("validation failed for: {}", .fields.join(", "))]
    ValidationFailed {
        /// Offending field names.
        fields: FieldNames,
    },

    /// Status pair outside the lifecycle graph.
    #[error("cannot transition from {current} to {requested}")]
    InvalidTransition {
        /// Current status.
        current: &'static str,

        /// Requested status.
        requested: &'static str,
    },

    /// Already decided, or a concurrent writer won.
    #[error("{reason}")]
    Conflict {
        /// Human-readable reason.
        reason: &'static str,
    },

    /// Storage rejected the data through a not-null or check constraint.
    #[error("record rejected by storage constraints")]
    Rejected(#[source] Error),

    /// Underlying SQL/storage error.
    #[error("storage error")]
    Sql(#[source] Error),
}

impl LifecycleError {
    /// Conflict reported when a status-guarded write matched no rows.
    pub(crate) const STALE: Self = Self::Conflict {
        reason: "resource was modified concurrently",
    };

    /// Taxonomy code of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Forbidden { .. } => ErrorCode::Forbidden,
            Self::NotFound => ErrorCode::NotFound,
            Self::ValidationFailed { .. } | Self::Rejected(_) => ErrorCode::ValidationFailed,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::Conflict { .. } => ErrorCode::Conflict,
            Self::Sql(_) => ErrorCode::Internal,
        }
    }

    /// Whether the failure is recorded in the audit trail.
    #[must_use]
    pub const fn is_audited(&self) -> bool {
        matches!(self, Self::Forbidden { .. } | Self::Conflict { .. })
    }

    /// Whether `error` is a unique violation, which callers usually want to
    /// report as a more specific conflict.
    pub(crate) fn is_unique_violation(error: &Error) -> bool {
        matches!(
            error.as_database_error().map(DatabaseError::kind),
            Some(ErrorKind::UniqueViolation)
        )
    }
}

impl From<GuardError> for LifecycleError {
    fn from(error: GuardError) -> Self {
        match error {
            GuardError::Forbidden { action } => Self::Forbidden { action },
            GuardError::NotFound => Self::NotFound,
            GuardError::ValidationFailed { fields } => Self::ValidationFailed { fields },
            GuardError::InvalidTransition { current, requested } => {
                Self::InvalidTransition { current, requested }
            }
            GuardError::Conflict { reason } => Self::Conflict { reason },
        }
    }
}

impl From<StateViolation> for LifecycleError {
    fn from(violation: StateViolation) -> Self {
        GuardError::from(violation).into()
    }
}

impl From<Error> for LifecycleError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict {
                reason: "a conflicting record already exists",
            },
            Some(ErrorKind::ForeignKeyViolation) => Self::NotFound,
            Some(ErrorKind::NotNullViolation | ErrorKind::CheckViolation) => Self::Rejected(error),
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_is_not_found() {
        let error = LifecycleError::from(Error::RowNotFound);

        assert!(matches!(error, LifecycleError::NotFound), "got {error:?}");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[test]
    fn other_storage_errors_are_internal() {
        let error = LifecycleError::from(Error::PoolTimedOut);

        assert_eq!(error.code(), ErrorCode::Internal);
        assert!(!error.is_audited());
    }

    #[test]
    fn guard_errors_map_one_to_one() {
        let error = LifecycleError::from(GuardError::InvalidTransition {
            current: "pending",
            requested: "completed",
        });

        assert_eq!(error.to_string(), "cannot transition from pending to completed");
        assert_eq!(error.code(), ErrorCode::InvalidTransition);
    }

    #[test]
    fn only_denials_and_lost_races_are_audited() {
        assert!(LifecycleError::STALE.is_audited());
        assert!(LifecycleError::Forbidden { action: "x" }.is_audited());
        assert!(!LifecycleError::NotFound.is_audited());
    }
}
