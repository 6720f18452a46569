use super::domain::{Application, ApplicationId, ApplicationStatus};
use crate::marketplace::catalog::JobId;
use crate::marketplace::error::RepositoryError;
use crate::marketplace::identity::PrincipalId;

/// Storage abstraction for the application ledger.
///
/// The two check-then-act invariants live behind this seam so they hold
/// under concurrent callers:
/// - `insert` must atomically reject a second record for the same
///   `(job_id, candidate_id)` pair with `RepositoryError::Conflict`,
///   regardless of the existing record's status.
/// - `transition` must atomically compare-and-set `Pending` to the target
///   status, failing with `RepositoryError::Conflict` when the record is no
///   longer pending. Exactly one of two racing callers wins.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn transition(
        &self,
        id: &ApplicationId,
        to: ApplicationStatus,
    ) -> Result<Application, RepositoryError>;
    fn for_candidate(&self, candidate: &PrincipalId) -> Result<Vec<Application>, RepositoryError>;
    fn for_jobs(&self, jobs: &[JobId]) -> Result<Vec<Application>, RepositoryError>;
}
