//! Tenants service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::info;

use mailroom::uuids::TenantUuid;

use crate::{
    database::Db,
    domain::tenants::{
        data::{NewCompany, NewLocation, NewMailbox, NewTenant},
        errors::TenantsServiceError,
        records::{CompanyRecord, LocationRecord, MailboxRecord, TenantRecord},
        repositories::{
            PgCompaniesRepository, PgLocationsRepository, PgMailboxesRepository,
            PgTenantsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgTenantsService {
    db: Db,
    repository: PgTenantsRepository,
    locations: PgLocationsRepository,
    companies: PgCompaniesRepository,
    mailboxes: PgMailboxesRepository,
}

impl PgTenantsService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            db: Db::new(pool.clone()),
            repository: PgTenantsRepository::new(pool),
            locations: PgLocationsRepository::new(),
            companies: PgCompaniesRepository::new(),
            mailboxes: PgMailboxesRepository::new(),
        }
    }
}

#[async_trait]
impl TenantsService for PgTenantsService {
    async fn create_tenant(&self, tenant: NewTenant) -> Result<TenantRecord, TenantsServiceError> {
        let record = self.repository.create_tenant(tenant).await?;

        info!(tenant_uuid = %record.uuid, "created tenant");

        Ok(record)
    }

    #[tracing::instrument(
        name = "tenants.service.create_location",
        skip(self, location),
        fields(tenant_uuid = %tenant, location_uuid = %location.uuid),
        err
    )]
    async fn create_location(
        &self,
        tenant: TenantUuid,
        location: NewLocation,
    ) -> Result<LocationRecord, TenantsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self
            .locations
            .create_location(&mut tx, tenant, location)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "tenants.service.create_company",
        skip(self, company),
        fields(tenant_uuid = %tenant, company_uuid = %company.uuid),
        err
    )]
    async fn create_company(
        &self,
        tenant: TenantUuid,
        company: NewCompany,
    ) -> Result<CompanyRecord, TenantsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self
            .companies
            .create_company(&mut tx, tenant, company)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "tenants.service.create_mailbox",
        skip(self, mailbox),
        fields(tenant_uuid = %tenant, mailbox_uuid = %mailbox.uuid),
        err
    )]
    async fn create_mailbox(
        &self,
        tenant: TenantUuid,
        mailbox: NewMailbox,
    ) -> Result<MailboxRecord, TenantsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let record = self
            .mailboxes
            .create_mailbox(&mut tx, tenant, mailbox)
            .await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[automock]
#[async_trait]
/// Tenant and directory setup operations.
pub trait TenantsService: Send + Sync {
    /// Creates a new tenant.
    async fn create_tenant(&self, tenant: NewTenant) -> Result<TenantRecord, TenantsServiceError>;

    /// Creates a location within a tenant.
    async fn create_location(
        &self,
        tenant: TenantUuid,
        location: NewLocation,
    ) -> Result<LocationRecord, TenantsServiceError>;

    /// Creates a company within a tenant.
    async fn create_company(
        &self,
        tenant: TenantUuid,
        company: NewCompany,
    ) -> Result<CompanyRecord, TenantsServiceError>;

    /// Creates a mailbox at one of the tenant's locations.
    async fn create_mailbox(
        &self,
        tenant: TenantUuid,
        mailbox: NewMailbox,
    ) -> Result<MailboxRecord, TenantsServiceError>;
}
