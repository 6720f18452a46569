use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use tracing::info;

use super::domain::{JobDraft, JobId, JobPosting, JobPostingView};
use super::repository::JobRepository;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::{Principal, Role};

static JOB_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_job_id() -> JobId {
    let id = JOB_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    JobId(format!("job-{id:06}"))
}

/// Owns job postings and enforces creation-time authorization. Reads are
/// public and pure; only the write path checks the caller's role.
pub struct JobCatalogService<J> {
    repository: Arc<J>,
}

impl<J> JobCatalogService<J>
where
    J: JobRepository + 'static,
{
    pub fn new(repository: Arc<J>) -> Self {
        Self { repository }
    }

    pub fn create_job(
        &self,
        principal: &Principal,
        draft: JobDraft,
    ) -> Result<JobPosting, MarketplaceError> {
        if !principal.has_role(Role::Employer) {
            return Err(MarketplaceError::Unauthorized(
                "only employers may create job postings",
            ));
        }

        let title = draft.title.trim();
        let location = draft.location.trim();
        let mut missing = Vec::new();
        if title.is_empty() {
            missing.push("title");
        }
        if location.is_empty() {
            missing.push("location");
        }
        if draft.deadline.is_none() {
            missing.push("deadline");
        }
        let deadline = match draft.deadline {
            Some(deadline) if missing.is_empty() => deadline,
            _ => {
                return Err(MarketplaceError::Validation(format!(
                    "missing required fields: {}",
                    missing.join(", ")
                )))
            }
        };

        let job = JobPosting {
            id: next_job_id(),
            owner_id: principal.id.clone(),
            title: title.to_string(),
            description: draft.description,
            location: location.to_string(),
            salary_range: draft.salary_range,
            deadline,
            category: draft
                .category
                .map(|category| category.trim().to_string())
                .filter(|category| !category.is_empty()),
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(job)?;
        info!(job_id = %stored.id.0, owner = %stored.owner_id.0, "job posting created");
        Ok(stored)
    }

    /// Public listing, newest first. No per-caller scoping: every posting is
    /// visible to everyone, including unauthenticated callers.
    pub fn list_jobs(&self, filter: Option<&str>) -> Result<Vec<JobPosting>, MarketplaceError> {
        let mut jobs = self.repository.list()?;

        if let Some(term) = filter.map(str::trim).filter(|term| !term.is_empty()) {
            jobs.retain(|job| job.matches_filter(term));
        }

        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.0.cmp(&a.id.0)));
        Ok(jobs)
    }

    pub fn list_views(
        &self,
        filter: Option<&str>,
        today: NaiveDate,
    ) -> Result<Vec<JobPostingView>, MarketplaceError> {
        Ok(self
            .list_jobs(filter)?
            .into_iter()
            .map(|job| job.listing_view(today))
            .collect())
    }

    pub fn get_job(&self, id: &JobId) -> Result<JobPosting, MarketplaceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| MarketplaceError::NotFound {
                entity: "job",
                id: id.0.clone(),
            })
    }

    pub fn get_view(&self, id: &JobId) -> Result<JobPostingView, MarketplaceError> {
        let job = self.get_job(id)?;
        Ok(job.listing_view(Local::now().date_naive()))
    }
}
