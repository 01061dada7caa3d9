//! Lifecycle Coordinator
//!
//! Every workflow mutation runs through the [`Coordinator`]: one tenant
//! transaction, one success audit record committed with it, and a
//! best-effort failure record when the attempt was denied or lost a race.

mod coordinator;
pub mod errors;

pub(crate) use coordinator::Coordinator;
pub use errors::LifecycleError;
