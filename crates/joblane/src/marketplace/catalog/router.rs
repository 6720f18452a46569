use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde::Deserialize;

use super::domain::{JobDraft, JobId};
use super::repository::JobRepository;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::router::bearer_token;
use crate::marketplace::identity::PrincipalRepository;
use crate::marketplace::ledger::ApplicationRepository;
use crate::marketplace::Marketplace;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListJobsQuery {
    #[serde(default)]
    pub(crate) filter: Option<String>,
}

/// Router builder for the job catalog boundary. Listing and detail reads are
/// public; creation requires an employer bearer credential.
pub fn job_router<P, J, A>(marketplace: Arc<Marketplace<P, J, A>>) -> Router
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            get(list_jobs_handler::<P, J, A>).post(create_job_handler::<P, J, A>),
        )
        .route("/api/v1/jobs/:job_id", get(get_job_handler::<P, J, A>))
        .with_state(marketplace)
}

async fn list_jobs_handler<P, J, A>(
    State(marketplace): State<Arc<Marketplace<P, J, A>>>,
    Query(query): Query<ListJobsQuery>,
) -> Result<Response, MarketplaceError>
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let today = Local::now().date_naive();
    let views = marketplace
        .catalog
        .list_views(query.filter.as_deref(), today)?;
    Ok(Json(views).into_response())
}

async fn get_job_handler<P, J, A>(
    State(marketplace): State<Arc<Marketplace<P, J, A>>>,
    Path(job_id): Path<String>,
) -> Result<Response, MarketplaceError>
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let view = marketplace.catalog.get_view(&JobId(job_id))?;
    Ok(Json(view).into_response())
}

async fn create_job_handler<P, J, A>(
    State(marketplace): State<Arc<Marketplace<P, J, A>>>,
    headers: HeaderMap,
    Json(draft): Json<JobDraft>,
) -> Result<Response, MarketplaceError>
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let token = bearer_token(&headers)?;
    let principal = marketplace.identity.principal_for_bearer(token)?;
    let job = marketplace.catalog.create_job(&principal, draft)?;
    Ok((StatusCode::CREATED, Json(job)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults_to_no_filter() {
        let query: ListJobsQuery = serde_json::from_str("{}").expect("empty query");
        assert!(query.filter.is_none());
    }
}
