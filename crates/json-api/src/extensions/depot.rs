//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;

use mailroom::actor::Actor;

use crate::errors::ApiError;

/// Typed access to values stored by middleware.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_actor(&mut self, actor: Actor);

    fn actor_or_401(&self) -> Result<&Actor, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>().map_err(|_ignored| ApiError::internal())
    }

    fn insert_actor(&mut self, actor: Actor) {
        self.inject(actor);
    }

    fn actor_or_401(&self) -> Result<&Actor, ApiError> {
        self.obtain::<Actor>()
            .map_err(|_ignored| ApiError::unauthorized("missing actor claims"))
    }
}
