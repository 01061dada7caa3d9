//! Tenant Repositories

mod companies;
mod locations;
mod mailboxes;
mod tenants;

pub(crate) use companies::PgCompaniesRepository;
pub(crate) use locations::PgLocationsRepository;
pub(crate) use mailboxes::PgMailboxesRepository;
pub(crate) use tenants::PgTenantsRepository;
