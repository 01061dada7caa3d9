//! Persistence and lifecycle coordination for the mailroom core.

pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;
