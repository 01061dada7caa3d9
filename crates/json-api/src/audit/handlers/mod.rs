//! Audit Handlers

pub(crate) mod index;
