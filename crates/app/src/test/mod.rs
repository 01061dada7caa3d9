//! Shared fixtures for service tests against a real Postgres.

pub(crate) mod helpers;

pub(crate) use context::TestContext;
