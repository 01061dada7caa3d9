//! Header claims parsing.

use std::str::FromStr;

use salvo::http::HeaderMap;
use thiserror::Error;

use mailroom::{
    actor::{Actor, Role},
    uuids::{ActorUuid, TenantUuid},
};

pub(crate) const ACTOR_ID_HEADER: &str = "x-actor-id";
pub(crate) const TENANT_ID_HEADER: &str = "x-tenant-id";
pub(crate) const ROLES_HEADER: &str = "x-actor-roles";
pub(crate) const LOCATIONS_HEADER: &str = "x-actor-locations";
pub(crate) const MAILBOXES_HEADER: &str = "x-actor-mailboxes";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ClaimsError {
    #[error("missing {0} header")]
    Missing(&'static str),

    #[error("malformed {0} header")]
    Malformed(&'static str),
}

/// Build the calling [`Actor`] from identity headers.
///
/// Identity and tenant are required, as is at least one role. Location and
/// mailbox assignments default to none.
pub(crate) fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, ClaimsError> {
    let uuid: ActorUuid = required(headers, ACTOR_ID_HEADER)?;
    let tenant: TenantUuid = required(headers, TENANT_ID_HEADER)?;

    let roles: Vec<Role> = list(headers, ROLES_HEADER)?;

    if roles.is_empty() {
        return Err(ClaimsError::Missing(ROLES_HEADER));
    }

    let mut actor = roles
        .into_iter()
        .fold(Actor::new(uuid, tenant), Actor::with_role);

    actor = list(headers, LOCATIONS_HEADER)?
        .into_iter()
        .fold(actor, Actor::with_location);

    actor = list(headers, MAILBOXES_HEADER)?
        .into_iter()
        .fold(actor, Actor::with_mailbox);

    Ok(actor)
}

fn header<'h>(headers: &'h HeaderMap, name: &'static str) -> Result<Option<&'h str>, ClaimsError> {
    headers
        .get(name)
        .map(|value| value.to_str().map_err(|_ignored| ClaimsError::Malformed(name)))
        .transpose()
}

fn required<T: FromStr>(headers: &HeaderMap, name: &'static str) -> Result<T, ClaimsError> {
    let value = header(headers, name)?
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ClaimsError::Missing(name))?;

    value.parse().map_err(|_ignored| ClaimsError::Malformed(name))
}

fn list<T: FromStr>(headers: &HeaderMap, name: &'static str) -> Result<Vec<T>, ClaimsError> {
    let Some(value) = header(headers, name)? else {
        return Ok(Vec::new());
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| entry.parse().map_err(|_ignored| ClaimsError::Malformed(name)))
        .collect()
}
