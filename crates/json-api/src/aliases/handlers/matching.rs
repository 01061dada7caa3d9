//! Match Aliases Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    aliases::responses::CompanyAliasResponse, errors::ApiError, extensions::*, state::State,
};

/// Match Aliases Handler
///
/// Returns active routing rules whose normalized alias equals the normalized
/// `text`.
#[endpoint(
    tags("aliases"),
    summary = "Match Aliases",
    status_codes(200, 401, 403, 422, 500)
)]
pub(crate) async fn handler(
    text: QueryParam<String, true>,
    depot: &mut Depot,
) -> Result<Json<Vec<CompanyAliasResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;

    let aliases = state
        .app
        .aliases
        .match_alias(actor, &text.into_inner())
        .await?;

    Ok(Json(
        aliases.into_iter().map(CompanyAliasResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;
    use uuid::Uuid;

    use mailroom_app::domain::{aliases::MockAliasesService, lifecycle::LifecycleError};

    use crate::test_helpers::{MockApp, make_company_alias};

    use super::*;

    fn make_service(aliases: MockAliasesService) -> Service {
        MockApp {
            aliases,
            ..MockApp::default()
        }
        .service(Router::with_path("aliases/match").get(handler))
    }

    #[tokio::test]
    async fn test_match_returns_aliases() -> TestResult {
        let alias = Uuid::now_v7();

        let mut aliases = MockAliasesService::new();

        aliases
            .expect_match_alias()
            .once()
            .withf(|_, text| text == "Acme  Widgets")
            .return_once(move |_, _| Ok(vec![make_company_alias(alias)]));

        let mut res = TestClient::get("http://example.com/aliases/match?text=Acme%20%20Widgets")
            .send(&make_service(aliases))
            .await;

        let body: Vec<CompanyAliasResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.len(), 1);
        assert_eq!(body.first().map(|alias| alias.uuid), Some(alias));

        Ok(())
    }

    #[tokio::test]
    async fn test_customers_are_forbidden() -> TestResult {
        let mut aliases = MockAliasesService::new();

        aliases.expect_match_alias().once().return_once(|_, _| {
            Err(LifecycleError::Forbidden {
                action: "match aliases",
            })
        });

        let res = TestClient::get("http://example.com/aliases/match?text=acme")
            .send(&make_service(aliases))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
