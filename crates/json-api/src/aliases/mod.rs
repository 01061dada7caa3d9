//! Alias Suggestions and Company Aliases

mod handlers;
pub(crate) mod responses;

pub(crate) use handlers::*;
