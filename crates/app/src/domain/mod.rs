//! Mailroom Domain Concerns

pub mod aliases;
pub mod audit;
pub mod health;
pub mod lifecycle;
pub mod mail_items;
pub mod requests;
pub mod tenants;
