use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::Deserialize;

use super::domain::{ApplicationId, Decision};
use super::repository::ApplicationRepository;
use crate::marketplace::access::ApplicationViewScope;
use crate::marketplace::catalog::{JobId, JobRepository};
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::router::bearer_token;
use crate::marketplace::identity::PrincipalRepository;
use crate::marketplace::Marketplace;

#[derive(Debug, Deserialize)]
pub(crate) struct ApplyRequest {
    pub(crate) job_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub(crate) decision: Decision,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListApplicationsQuery {
    #[serde(default)]
    pub(crate) view: Option<ApplicationViewScope>,
}

/// Router builder for the application ledger boundary. Every endpoint
/// requires a bearer credential; listings go through the access-scoped
/// query layer.
pub fn application_router<P, J, A>(marketplace: Arc<Marketplace<P, J, A>>) -> Router
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/applications",
            get(list_applications_handler::<P, J, A>).post(apply_handler::<P, J, A>),
        )
        .route(
            "/api/v1/applications/:application_id",
            patch(decide_handler::<P, J, A>),
        )
        .with_state(marketplace)
}

async fn apply_handler<P, J, A>(
    State(marketplace): State<Arc<Marketplace<P, J, A>>>,
    headers: HeaderMap,
    Json(request): Json<ApplyRequest>,
) -> Result<Response, MarketplaceError>
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let token = bearer_token(&headers)?;
    let principal = marketplace.identity.principal_for_bearer(token)?;
    let application = marketplace
        .ledger
        .apply(&principal, &JobId(request.job_id))?;
    Ok((StatusCode::CREATED, Json(application)).into_response())
}

async fn list_applications_handler<P, J, A>(
    State(marketplace): State<Arc<Marketplace<P, J, A>>>,
    headers: HeaderMap,
    Query(query): Query<ListApplicationsQuery>,
) -> Result<Response, MarketplaceError>
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let token = bearer_token(&headers)?;
    let principal = marketplace.identity.principal_for_bearer(token)?;
    let applications = marketplace
        .queries
        .applications_for(&principal, query.view)?;
    Ok(Json(applications).into_response())
}

async fn decide_handler<P, J, A>(
    State(marketplace): State<Arc<Marketplace<P, J, A>>>,
    headers: HeaderMap,
    Path(application_id): Path<String>,
    Json(request): Json<DecisionRequest>,
) -> Result<Response, MarketplaceError>
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let token = bearer_token(&headers)?;
    let principal = marketplace.identity.principal_for_bearer(token)?;
    let settled = marketplace.ledger.decide(
        &principal,
        &ApplicationId(application_id),
        request.decision,
    )?;
    Ok(Json(settled).into_response())
}
