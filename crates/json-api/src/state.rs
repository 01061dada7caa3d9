//! Shared handler state.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};

use mailroom_app::context::AppContext;

/// Services plus process facts, injected into every request's depot.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    started_at: Timestamp,
}

impl State {
    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self {
            app,
            started_at: Timestamp::now(),
        })
    }

    /// Time since the state was built, i.e. since the server started.
    pub(crate) fn uptime(&self) -> SignedDuration {
        Timestamp::now().duration_since(self.started_at)
    }
}
