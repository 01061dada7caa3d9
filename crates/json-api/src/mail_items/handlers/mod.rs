//! Mail Item Handlers

pub(crate) mod archive;
pub(crate) mod create;
pub(crate) mod get;
