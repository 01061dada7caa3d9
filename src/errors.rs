//! Lifecycle errors
//!
//! Every guard in this crate fails with a [`GuardError`]. Each error maps to
//! exactly one [`ErrorCode`], the stable machine-readable taxonomy shared by
//! all three workflows and exposed to API callers.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// Names of offending input fields.
pub type FieldNames = SmallVec<[&'static str; 2]>;

/// Stable error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No actor identity was supplied.
    Unauthorized,

    /// The actor lacks the role or location scope for the operation.
    Forbidden,

    /// The entity is absent or outside the actor's tenant/location scope.
    NotFound,

    /// Malformed input or missing type-dependent fields.
    ValidationFailed,

    /// The requested status is not reachable from the current one.
    InvalidTransition,

    /// The entity already left the decidable state, or a concurrent writer won.
    Conflict,

    /// Storage or other unexpected failure.
    Internal,
}

impl ErrorCode {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::ValidationFailed => "validation_failed",
            Self::InvalidTransition => "invalid_transition",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Failure of a pure lifecycle guard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardError {
    /// The actor may not perform the action.
    #[error("not permitted to {action}")]
    Forbidden {
        /// What was attempted, phrased as a verb phrase.
        action: &'static str,
    },

    /// The entity does not exist from the actor's point of view.
    #[error("resource not found")]
    NotFound,

    /// One or more fields are missing or malformed.
    #[error("validation failed for: {}", .fields.join(", "))]
    ValidationFailed {
        /// Offending field names, in declaration order.
        fields: FieldNames,
    },

    /// The status pair is not an edge of the lifecycle graph.
    #[error("cannot transition from {current} to {requested}")]
    InvalidTransition {
        /// Status the entity is in.
        current: &'static str,

        /// Status that was asked for.
        requested: &'static str,
    },

    /// The entity already left the state in which the operation is decidable.
    #[error("{reason}")]
    Conflict {
        /// Human-readable reason.
        reason: &'static str,
    },
}

impl GuardError {
    /// Validation failure naming the given fields.
    pub fn invalid_fields(fields: impl IntoIterator<Item = &'static str>) -> Self {
        Self::ValidationFailed {
            fields: fields.into_iter().collect(),
        }
    }

    /// Taxonomy code of this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Forbidden { .. } => ErrorCode::Forbidden,
            Self::NotFound => ErrorCode::NotFound,
            Self::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            Self::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            Self::Conflict { .. } => ErrorCode::Conflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_enumerates_fields() {
        let error = GuardError::invalid_fields(["carrier", "tracking_number"]);

        assert_eq!(
            error.to_string(),
            "validation failed for: carrier, tracking_number"
        );
        assert_eq!(error.code(), ErrorCode::ValidationFailed);
    }

    #[test]
    fn codes_serialize_as_snake_case() -> testresult::TestResult {
        assert_eq!(
            serde_json::to_string(&ErrorCode::InvalidTransition)?,
            "\"invalid_transition\""
        );
        assert_eq!(ErrorCode::NotFound.to_string(), "not_found");

        Ok(())
    }
}
