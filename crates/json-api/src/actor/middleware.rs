//! Actor claims middleware.

use salvo::prelude::*;
use tracing::{Span, warn};

use crate::{actor::actor_from_headers, errors::ApiError, extensions::*};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let actor = match actor_from_headers(req.headers()) {
        Ok(actor) => actor,
        Err(claims_error) => {
            warn!("rejected actor claims: {claims_error}");

            res.render(ApiError::unauthorized(claims_error.to_string()));
            ctrl.skip_rest();

            return;
        }
    };

    let span = Span::current();

    span.record("actor_id", tracing::field::display(actor.uuid));
    span.record("tenant_id", tracing::field::display(actor.tenant));

    depot.insert_actor(actor);

    ctrl.call_next(req, depot, res).await;
}
