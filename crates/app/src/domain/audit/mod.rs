//! Audit Records

pub mod data;
pub mod records;
mod repository;
pub mod service;

pub(crate) use repository::PgAuditRepository;
pub use service::*;
