use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, Utc};
use tracing::info;

use super::domain::{Application, ApplicationId, ApplicationStatus, Decision};
use super::repository::ApplicationRepository;
use crate::marketplace::catalog::{JobId, JobRepository};
use crate::marketplace::error::{MarketplaceError, RepositoryError};
use crate::marketplace::identity::{Principal, Role};

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id() -> ApplicationId {
    let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("app-{id:06}"))
}

/// Owns the application ledger: creation-time authorization, pair
/// uniqueness, and the pending-to-terminal state machine.
pub struct ApplicationLedgerService<J, A> {
    jobs: Arc<J>,
    applications: Arc<A>,
}

impl<J, A> ApplicationLedgerService<J, A>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    pub fn new(jobs: Arc<J>, applications: Arc<A>) -> Self {
        Self { jobs, applications }
    }

    /// File a candidate's application against an existing, non-expired
    /// posting. The duplicate-pair check is enforced atomically by the
    /// repository; a losing concurrent caller gets `DuplicateApplication`.
    pub fn apply(
        &self,
        principal: &Principal,
        job_id: &JobId,
    ) -> Result<Application, MarketplaceError> {
        if !principal.has_role(Role::Candidate) {
            return Err(MarketplaceError::Unauthorized(
                "only candidates may apply to jobs",
            ));
        }

        let job = self
            .jobs
            .fetch(job_id)?
            .ok_or_else(|| MarketplaceError::NotFound {
                entity: "job",
                id: job_id.0.clone(),
            })?;

        if !job.open_for_applications(Local::now().date_naive()) {
            return Err(MarketplaceError::DeadlinePassed);
        }

        let application = Application {
            id: next_application_id(),
            job_id: job.id.clone(),
            candidate_id: principal.id.clone(),
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
        };

        match self.applications.insert(application) {
            Ok(stored) => {
                info!(
                    application_id = %stored.id.0,
                    job_id = %stored.job_id.0,
                    candidate = %stored.candidate_id.0,
                    "application filed"
                );
                Ok(stored)
            }
            Err(RepositoryError::Conflict) => Err(MarketplaceError::DuplicateApplication),
            Err(other) => Err(other.into()),
        }
    }

    /// Settle a pending application. Only the principal owning the
    /// referenced job may decide; the pending check is a repository-level
    /// compare-and-set, so a repeat or racing decision fails with
    /// `InvalidTransition` instead of silently succeeding.
    pub fn decide(
        &self,
        principal: &Principal,
        application_id: &ApplicationId,
        decision: Decision,
    ) -> Result<Application, MarketplaceError> {
        let application = self.applications.fetch(application_id)?.ok_or_else(|| {
            MarketplaceError::NotFound {
                entity: "application",
                id: application_id.0.clone(),
            }
        })?;

        let job =
            self.jobs
                .fetch(&application.job_id)?
                .ok_or_else(|| MarketplaceError::NotFound {
                    entity: "job",
                    id: application.job_id.0.clone(),
                })?;

        if job.owner_id != principal.id {
            return Err(MarketplaceError::Unauthorized(
                "only the posting owner may decide on its applications",
            ));
        }

        match self
            .applications
            .transition(application_id, decision.target_status())
        {
            Ok(settled) => {
                info!(
                    application_id = %settled.id.0,
                    status = settled.status.label(),
                    "application settled"
                );
                Ok(settled)
            }
            Err(RepositoryError::Conflict) => Err(MarketplaceError::InvalidTransition),
            Err(RepositoryError::NotFound) => Err(MarketplaceError::NotFound {
                entity: "application",
                id: application_id.0.clone(),
            }),
            Err(other) => Err(other.into()),
        }
    }

    /// Applications filed by this principal, newest first.
    pub fn list_for_candidate(
        &self,
        principal: &Principal,
    ) -> Result<Vec<Application>, MarketplaceError> {
        let mut applications = self.applications.for_candidate(&principal.id)?;
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(applications)
    }

    /// Applications against postings this principal owns, newest first.
    pub fn list_for_employer(
        &self,
        principal: &Principal,
    ) -> Result<Vec<Application>, MarketplaceError> {
        let owned: Vec<JobId> = self
            .jobs
            .list()?
            .into_iter()
            .filter(|job| job.owner_id == principal.id)
            .map(|job| job.id)
            .collect();

        let mut applications = self.applications.for_jobs(&owned)?;
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(applications)
    }
}
