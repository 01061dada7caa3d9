//! Alias Handlers

pub(crate) mod decide;
pub(crate) mod get;
pub(crate) mod matching;
pub(crate) mod submit;
