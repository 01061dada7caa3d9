//! Mailroom
//!
//! Mailroom is the lifecycle core of a multi-tenant virtual mailbox operator:
//! the guarded state machines that move mail items, fulfillment requests and
//! alias suggestions between statuses.
//!
//! Everything in this crate is pure. Persistence, transactions and audit
//! emission live in `mailroom-app`; this crate only decides whether a
//! transition is legal for a given [`actor::Actor`] and what it leads to.

pub mod actor;
pub mod aliases;
pub mod errors;
pub mod mail_items;
pub mod prelude;
pub mod requests;
pub mod uuids;
