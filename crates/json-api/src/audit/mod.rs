//! Audit Trail

mod handlers;

pub(crate) use handlers::*;
