//! Actor claims
//!
//! Identity is resolved upstream; this service only reads the claims the
//! identity layer forwards as headers and turns them into an [`Actor`].
//!
//! [`Actor`]: mailroom::actor::Actor

mod claims;
pub(crate) mod middleware;

pub(crate) use claims::*;
