//! Marketplace core: identity, job catalog, application ledger, and the
//! access-scoped query layer, each split into domain, repository, service,
//! and router modules behind trait seams.

pub mod access;
pub mod catalog;
pub mod error;
pub mod identity;
pub mod ledger;

use std::sync::Arc;

use axum::Router;

use crate::config::AuthConfig;
use access::ScopedQueries;
use catalog::{JobCatalogService, JobRepository};
use identity::{IdentityGateway, PrincipalRepository};
use ledger::{ApplicationLedgerService, ApplicationRepository};

pub use access::ApplicationViewScope;
pub use error::{MarketplaceError, RepositoryError};

/// The assembled marketplace: one value wiring the identity boundary to the
/// catalog, ledger, and query layer over caller-supplied repositories.
pub struct Marketplace<P, J, A> {
    pub identity: IdentityGateway<P>,
    pub catalog: JobCatalogService<J>,
    pub ledger: Arc<ApplicationLedgerService<J, A>>,
    pub queries: ScopedQueries<J, A>,
}

impl<P, J, A> Marketplace<P, J, A>
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    pub fn new(
        principals: Arc<P>,
        jobs: Arc<J>,
        applications: Arc<A>,
        auth: &AuthConfig,
    ) -> Self {
        let ledger = Arc::new(ApplicationLedgerService::new(jobs.clone(), applications));
        Self {
            identity: IdentityGateway::new(principals, auth),
            catalog: JobCatalogService::new(jobs),
            queries: ScopedQueries::new(ledger.clone()),
            ledger,
        }
    }
}

/// Router exposing the full marketplace boundary.
pub fn marketplace_router<P, J, A>(marketplace: Arc<Marketplace<P, J, A>>) -> Router
where
    P: PrincipalRepository + 'static,
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    Router::new()
        .merge(identity::auth_router(marketplace.clone()))
        .merge(catalog::job_router(marketplace.clone()))
        .merge(ledger::application_router(marketplace))
}
