//! Completion payloads
//!
//! What staff must supply to complete a request depends on its type. The raw
//! [`CompletionPayload`] is validated into a [`CompletionMetadata`], which is
//! what gets persisted alongside `completed_at`.

use serde::{Deserialize, Serialize};

use crate::{
    errors::{FieldNames, GuardError},
    requests::RequestType,
};

/// Unvalidated completion fields as submitted by staff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionPayload {
    /// Shipping carrier.
    #[serde(default)]
    pub carrier: Option<String>,

    /// Carrier tracking number.
    #[serde(default)]
    pub tracking_number: Option<String>,

    /// References to uploaded scan files.
    #[serde(default)]
    pub scan_file_ids: Vec<String>,

    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Validated, type-specific completion record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompletionMetadata {
    /// The item left with a carrier.
    Shipment {
        /// Shipping carrier.
        carrier: String,

        /// Carrier tracking number.
        tracking_number: String,

        /// Free-text notes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },

    /// The item was opened and scanned.
    Scan {
        /// References to uploaded scan files, never empty.
        scan_file_ids: Vec<String>,

        /// Free-text notes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },

    /// Handled with no type-specific data.
    Handled {
        /// Free-text notes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    },
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl CompletionPayload {
    /// Validate the payload for a request of `request_type`.
    ///
    /// Blank strings count as missing. Scan file references are trimmed and
    /// blank entries dropped before the emptiness check.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::ValidationFailed`] naming exactly the missing
    /// fields.
    pub fn validate_for(self, request_type: RequestType) -> Result<CompletionMetadata, GuardError> {
        let notes = present(self.notes);

        if request_type.is_forward() {
            let carrier = present(self.carrier);
            let tracking_number = present(self.tracking_number);

            return match (carrier, tracking_number) {
                (Some(carrier), Some(tracking_number)) => Ok(CompletionMetadata::Shipment {
                    carrier,
                    tracking_number,
                    notes,
                }),
                (carrier, tracking_number) => {
                    let mut fields = FieldNames::new();

                    if carrier.is_none() {
                        fields.push("carrier");
                    }

                    if tracking_number.is_none() {
                        fields.push("tracking_number");
                    }

                    Err(GuardError::ValidationFailed { fields })
                }
            };
        }

        if request_type == RequestType::OpenScan {
            let scan_file_ids: Vec<String> = self
                .scan_file_ids
                .into_iter()
                .filter_map(|id| present(Some(id)))
                .collect();

            if scan_file_ids.is_empty() {
                return Err(GuardError::invalid_fields(["scan_file_ids"]));
            }

            return Ok(CompletionMetadata::Scan {
                scan_file_ids,
                notes,
            });
        }

        Ok(CompletionMetadata::Handled { notes })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn forward_payload(carrier: Option<&str>, tracking_number: Option<&str>) -> CompletionPayload {
        CompletionPayload {
            carrier: carrier.map(str::to_string),
            tracking_number: tracking_number.map(str::to_string),
            ..CompletionPayload::default()
        }
    }

    #[test]
    fn forward_names_only_the_missing_field() {
        let result = forward_payload(Some("UPS"), None).validate_for(RequestType::Forward);

        assert_eq!(result, Err(GuardError::invalid_fields(["tracking_number"])));
    }

    #[test]
    fn forward_names_both_fields_when_both_missing() {
        let result = forward_payload(None, Some("   ")).validate_for(RequestType::WeeklyForward);

        assert_eq!(
            result,
            Err(GuardError::invalid_fields(["carrier", "tracking_number"]))
        );
    }

    #[test]
    fn forward_with_both_fields_is_a_shipment() -> TestResult {
        let metadata = forward_payload(Some(" UPS "), Some("1Z999"))
            .validate_for(RequestType::BiweeklyForward)?;

        assert_eq!(
            metadata,
            CompletionMetadata::Shipment {
                carrier: "UPS".to_string(),
                tracking_number: "1Z999".to_string(),
                notes: None,
            }
        );

        Ok(())
    }

    #[test]
    fn open_scan_requires_a_scan_file() {
        let payload = CompletionPayload {
            scan_file_ids: vec![String::new(), "  ".to_string()],
            ..CompletionPayload::default()
        };

        assert_eq!(
            payload.validate_for(RequestType::OpenScan),
            Err(GuardError::invalid_fields(["scan_file_ids"]))
        );
    }

    #[test]
    fn other_types_need_nothing() -> TestResult {
        for request_type in [
            RequestType::Pickup,
            RequestType::Shred,
            RequestType::Recycle,
            RequestType::Deposit,
            RequestType::LeaveAtOffice,
        ] {
            assert_eq!(
                CompletionPayload::default().validate_for(request_type)?,
                CompletionMetadata::Handled { notes: None }
            );
        }

        Ok(())
    }

    #[test]
    fn metadata_serializes_with_a_kind_tag() -> TestResult {
        let metadata = CompletionMetadata::Scan {
            scan_file_ids: vec!["scan-1".to_string()],
            notes: Some("two pages".to_string()),
        };

        assert_eq!(
            serde_json::to_value(&metadata)?,
            serde_json::json!({
                "kind": "scan",
                "scan_file_ids": ["scan-1"],
                "notes": "two pages",
            })
        );

        Ok(())
    }
}
