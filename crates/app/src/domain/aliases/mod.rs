//! Alias Suggestions and Company Aliases

pub mod data;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use service::*;
