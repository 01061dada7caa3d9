//! Readiness of the storage the lifecycle workflows depend on.

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;

use crate::database::{self, Db};

/// What the API needs before it can serve tenant-scoped calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    /// The database answered.
    pub database: bool,

    /// The connected role is subject to row-level security.
    pub tenant_isolation: bool,
}

impl Readiness {
    /// Every check passed.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        self.database && self.tenant_isolation
    }
}

#[derive(Debug, Clone)]
pub struct PgHealthService {
    db: Db,
}

impl PgHealthService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HealthService for PgHealthService {
    #[tracing::instrument(name = "health.service.readiness", skip(self))]
    async fn readiness(&self) -> Readiness {
        match database::ensure_rls_enforced_role(self.db.pool()).await {
            Ok(()) => Readiness {
                database: true,
                tenant_isolation: true,
            },
            Err(sqlx::Error::Configuration(reason)) => {
                warn!("tenant isolation not enforced: {reason}");

                Readiness {
                    database: true,
                    tenant_isolation: false,
                }
            }
            Err(error) => {
                warn!("database unreachable: {error}");

                Readiness {
                    database: false,
                    tenant_isolation: false,
                }
            }
        }
    }
}

#[automock]
#[async_trait]
/// Health of the backing services.
pub trait HealthService: Send + Sync {
    /// Check the database and its row-level security posture.
    async fn readiness(&self) -> Readiness;
}
