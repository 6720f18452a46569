use super::domain::{JobId, JobPosting};
use crate::marketplace::error::RepositoryError;

/// Storage abstraction for job postings.
pub trait JobRepository: Send + Sync {
    fn insert(&self, job: JobPosting) -> Result<JobPosting, RepositoryError>;
    fn fetch(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError>;
    fn list(&self) -> Result<Vec<JobPosting>, RepositoryError>;
}
