use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::identity::PrincipalId;

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// An employer-authored listing open for candidate applications until its
/// deadline. Postings are never auto-deleted; past the deadline they remain
/// listable but stop accepting applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub owner_id: PrincipalId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub salary_range: String,
    pub deadline: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl JobPosting {
    /// Whether new applications are accepted on `today`. The deadline day
    /// itself still accepts applications.
    pub fn open_for_applications(&self, today: NaiveDate) -> bool {
        today <= self.deadline
    }

    /// Case-insensitive substring match over title and location, OR across
    /// the two fields.
    pub fn matches_filter(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.location.to_lowercase().contains(&needle)
    }

    pub fn listing_view(&self, today: NaiveDate) -> JobPostingView {
        JobPostingView {
            posting: self.clone(),
            open_for_applications: self.open_for_applications(today),
        }
    }
}

/// Inbound posting fields. Everything is optional at the wire level so
/// missing required fields surface as a validation failure rather than a
/// deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub salary_range: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub category: Option<String>,
}

/// A posting plus its applicability flag, as rendered at the boundary.
#[derive(Debug, Clone, Serialize)]
pub struct JobPostingView {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub open_for_applications: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(title: &str, location: &str, deadline: NaiveDate) -> JobPosting {
        JobPosting {
            id: JobId("job-000001".to_string()),
            owner_id: PrincipalId("user-000001".to_string()),
            title: title.to_string(),
            description: String::new(),
            location: location.to_string(),
            salary_range: String::new(),
            deadline,
            category: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn deadline_day_is_still_open() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let job = posting("Engineer", "Remote", today);
        assert!(job.open_for_applications(today));
        assert!(!job.open_for_applications(today.succ_opt().expect("next day")));
    }

    #[test]
    fn filter_matches_either_field_case_insensitively() {
        let deadline = NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date");
        let job = posting("Backend Engineer", "Hanoi", deadline);
        assert!(job.matches_filter("ENGINEER"));
        assert!(job.matches_filter("engineer"));
        assert!(job.matches_filter("hanoi"));
        assert!(!job.matches_filter("designer"));
    }
}
