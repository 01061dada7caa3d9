//! Parsing of enumerated request fields.

use std::str::FromStr;

use crate::errors::ApiError;

/// Parse a wire string into a closed enum, naming `field` on failure.
pub(crate) trait FieldExt {
    fn parse_field<T: FromStr>(&self, field: &'static str) -> Result<T, ApiError>;
}

impl FieldExt for str {
    fn parse_field<T: FromStr>(&self, field: &'static str) -> Result<T, ApiError> {
        self.trim()
            .parse()
            .map_err(|_ignored| ApiError::invalid_fields([field]))
    }
}
