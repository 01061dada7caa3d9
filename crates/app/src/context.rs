//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        aliases::{AliasesService, PgAliasesService},
        audit::{AuditService, PgAuditService},
        health::{HealthService, PgHealthService},
        mail_items::{MailItemsService, PgMailItemsService},
        requests::{PgRequestsService, RequestsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub mail_items: Arc<dyn MailItemsService>,
    pub requests: Arc<dyn RequestsService>,
    pub aliases: Arc<dyn AliasesService>,
    pub audit: Arc<dyn AuditService>,
    pub health: Arc<dyn HealthService>,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails or the
    /// connected role would bypass row-level security.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::ensure_rls_enforced_role(&pool)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(&Db::new(pool)))
    }

    /// Wire every service against `db`.
    #[must_use]
    pub fn from_db(db: &Db) -> Self {
        Self {
            mail_items: Arc::new(PgMailItemsService::new(db.clone())),
            requests: Arc::new(PgRequestsService::new(db.clone())),
            aliases: Arc::new(PgAliasesService::new(db.clone())),
            audit: Arc::new(PgAuditService::new(db.clone())),
            health: Arc::new(PgHealthService::new(db.clone())),
        }
    }
}
