use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use super::service::Registration;
use crate::marketplace::catalog::JobRepository;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::PrincipalRepository;
use crate::marketplace::ledger::ApplicationRepository;
use crate::marketplace::Marketplace;

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefreshRequest {
    pub(crate) refresh: String,
}

/// Router builder for the authentication boundary.
pub fn auth_router<P, J, A>(marketplace: Arc<Marketplace<P, J, A>>) -> Router
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<P, J, A>))
        .route("/api/v1/auth/token", post(token_handler::<P, J, A>))
        .route("/api/v1/auth/refresh", post(refresh_handler::<P, J, A>))
        .route("/api/v1/auth/me", get(me_handler::<P, J, A>))
        .with_state(marketplace)
}

/// Pull the bearer credential off the Authorization header.
///
/// A missing or malformed credential is an authentication failure, kept
/// distinct from the authorization failures raised past this point.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, MarketplaceError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(MarketplaceError::InvalidCredential)
}

async fn register_handler<P, J, A>(
    State(marketplace): State<Arc<Marketplace<P, J, A>>>,
    Json(registration): Json<Registration>,
) -> Result<Response, MarketplaceError>
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let principal = marketplace.identity.register(registration)?;
    Ok((StatusCode::CREATED, Json(principal.public_view())).into_response())
}

async fn token_handler<P, J, A>(
    State(marketplace): State<Arc<Marketplace<P, J, A>>>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, MarketplaceError>
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let pair = marketplace.identity.login(&request.email, &request.password)?;
    Ok(Json(pair).into_response())
}

async fn refresh_handler<P, J, A>(
    State(marketplace): State<Arc<Marketplace<P, J, A>>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Response, MarketplaceError>
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let pair = marketplace.identity.refresh(&request.refresh)?;
    Ok(Json(pair).into_response())
}

async fn me_handler<P, J, A>(
    State(marketplace): State<Arc<Marketplace<P, J, A>>>,
    headers: HeaderMap,
) -> Result<Response, MarketplaceError>
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    let token = bearer_token(&headers)?;
    let principal = marketplace.identity.principal_for_bearer(token)?;
    Ok(Json(principal.public_view()).into_response())
}
