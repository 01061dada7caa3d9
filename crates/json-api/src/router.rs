//! App Router

use salvo::Router;

use crate::{actor, aliases, audit, errors, mail_items, requests};

/// Routes that act on behalf of an authenticated actor.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(errors::malformed_input)
        .hoop(actor::middleware::handler)
        .push(
            Router::with_path("mail-items")
                .post(mail_items::create::handler)
                .push(
                    Router::with_path("{mail_item}")
                        .get(mail_items::get::handler)
                        .push(Router::with_path("archive").post(mail_items::archive::handler))
                        .push(Router::with_path("requests").post(requests::create::handler)),
                ),
        )
        .push(
            Router::with_path("requests/{request}")
                .get(requests::get::handler)
                .push(Router::with_path("status").post(requests::status::handler))
                .push(Router::with_path("cancel").post(requests::cancel::handler)),
        )
        .push(
            Router::with_path("alias-suggestions")
                .post(aliases::submit::handler)
                .push(
                    Router::with_path("{alias_suggestion}")
                        .get(aliases::get::handler)
                        .push(Router::with_path("decision").post(aliases::decide::handler)),
                ),
        )
        .push(Router::with_path("aliases/match").get(aliases::matching::handler))
        .push(Router::with_path("audit-records").get(audit::index::handler))
}
