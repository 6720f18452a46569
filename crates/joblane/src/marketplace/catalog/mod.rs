//! Job catalog: employer-authored postings with public, filterable reads.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{JobDraft, JobId, JobPosting, JobPostingView};
pub use repository::JobRepository;
pub use router::job_router;
pub use service::JobCatalogService;
