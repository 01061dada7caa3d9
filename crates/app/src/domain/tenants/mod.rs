//! Tenants
//!
//! Tenants and the directory rows hanging off them: locations, companies and
//! mailboxes. These are set up administratively and read by the lifecycle
//! workflows to resolve scope.

pub mod data;
pub mod errors;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::TenantsServiceError;
pub use service::*;
