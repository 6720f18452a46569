use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use joblane::marketplace::catalog::{JobId, JobPosting, JobRepository};
use joblane::marketplace::identity::{Principal, PrincipalId, PrincipalRepository};
use joblane::marketplace::ledger::{
    Application, ApplicationId, ApplicationRepository, ApplicationStatus,
};
use joblane::marketplace::RepositoryError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryPrincipalRepository {
    records: Arc<Mutex<HashMap<PrincipalId, Principal>>>,
}

impl PrincipalRepository for InMemoryPrincipalRepository {
    fn insert(&self, principal: Principal) -> Result<Principal, RepositoryError> {
        let mut guard = self.records.lock().expect("principal mutex poisoned");
        let duplicate = guard
            .values()
            .any(|existing| existing.email == principal.email || existing.id == principal.id);
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(principal.id.clone(), principal.clone());
        Ok(principal)
    }

    fn fetch(&self, id: &PrincipalId) -> Result<Option<Principal>, RepositoryError> {
        let guard = self.records.lock().expect("principal mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Principal>, RepositoryError> {
        let guard = self.records.lock().expect("principal mutex poisoned");
        Ok(guard.values().find(|p| p.email == email).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryJobRepository {
    records: Arc<Mutex<HashMap<JobId, JobPosting>>>,
}

impl JobRepository for InMemoryJobRepository {
    fn insert(&self, job: JobPosting) -> Result<JobPosting, RepositoryError> {
        let mut guard = self.records.lock().expect("job mutex poisoned");
        if guard.contains_key(&job.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn fetch(&self, id: &JobId) -> Result<Option<JobPosting>, RepositoryError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<JobPosting>, RepositoryError> {
        let guard = self.records.lock().expect("job mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Ledger store. Both invariant checks run under the single record lock:
/// pair uniqueness on insert, the pending compare-and-set on transition.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationRepository {
    records: Arc<Mutex<HashMap<ApplicationId, Application>>>,
}

impl ApplicationRepository for InMemoryApplicationRepository {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        let duplicate_pair = guard.values().any(|existing| {
            existing.job_id == application.job_id
                && existing.candidate_id == application.candidate_id
        });
        if duplicate_pair || guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn transition(
        &self,
        id: &ApplicationId,
        to: ApplicationStatus,
    ) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if record.status != ApplicationStatus::Pending {
            return Err(RepositoryError::Conflict);
        }
        record.status = to;
        Ok(record.clone())
    }

    fn for_candidate(&self, candidate: &PrincipalId) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| &application.candidate_id == candidate)
            .cloned()
            .collect())
    }

    fn for_jobs(&self, jobs: &[JobId]) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard
            .values()
            .filter(|application| jobs.contains(&application.job_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn application(id: &str, job: &str, candidate: &str) -> Application {
        Application {
            id: ApplicationId(id.to_string()),
            job_id: JobId(job.to_string()),
            candidate_id: PrincipalId(candidate.to_string()),
            status: ApplicationStatus::Pending,
            applied_at: Utc::now(),
        }
    }

    #[test]
    fn duplicate_pair_is_rejected_regardless_of_status() {
        let repository = InMemoryApplicationRepository::default();
        let first = application("app-1", "job-1", "user-1");
        repository.insert(first.clone()).expect("first insert");
        repository
            .transition(&first.id, ApplicationStatus::Rejected)
            .expect("settle first");

        let second = application("app-2", "job-1", "user-1");
        assert!(matches!(
            repository.insert(second),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn racing_duplicate_inserts_admit_exactly_one() {
        let repository = InMemoryApplicationRepository::default();
        let entries = [
            application("app-1", "job-1", "user-1"),
            application("app-2", "job-1", "user-1"),
        ];

        let handles: Vec<_> = entries
            .into_iter()
            .map(|entry| {
                let repository = repository.clone();
                std::thread::spawn(move || repository.insert(entry))
            })
            .collect();
        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("insert thread panicked"))
            .collect();

        let wins = results.iter().filter(|result| result.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|result| matches!(result, Err(RepositoryError::Conflict)))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(conflicts, 1);
    }

    #[test]
    fn racing_transitions_settle_exactly_once() {
        let repository = InMemoryApplicationRepository::default();
        let record = application("app-1", "job-1", "user-1");
        repository.insert(record.clone()).expect("insert");

        let handles: Vec<_> = [ApplicationStatus::Accepted, ApplicationStatus::Rejected]
            .into_iter()
            .map(|status| {
                let repository = repository.clone();
                let id = record.id.clone();
                std::thread::spawn(move || repository.transition(&id, status))
            })
            .collect();
        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().expect("transition thread panicked"))
            .collect();

        let wins = results.iter().filter(|result| result.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|result| matches!(result, Err(RepositoryError::Conflict)))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(conflicts, 1);

        // The surviving status is whichever transition won the lock.
        let settled = repository
            .fetch(&record.id)
            .expect("fetch")
            .expect("record present");
        assert!(settled.status.is_terminal());
    }

    #[test]
    fn transition_is_a_pending_compare_and_set() {
        let repository = InMemoryApplicationRepository::default();
        let record = application("app-1", "job-1", "user-1");
        repository.insert(record.clone()).expect("insert");

        let settled = repository
            .transition(&record.id, ApplicationStatus::Accepted)
            .expect("first transition wins");
        assert_eq!(settled.status, ApplicationStatus::Accepted);

        assert!(matches!(
            repository.transition(&record.id, ApplicationStatus::Rejected),
            Err(RepositoryError::Conflict)
        ));
    }
}
