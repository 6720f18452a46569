use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::marketplace::catalog::JobId;
use crate::marketplace::identity::PrincipalId;

/// Identifier wrapper for ledger entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

/// Application lifecycle. `Pending` is the only initial state; `Accepted`
/// and `Rejected` are terminal with no reverse or lateral transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// The owning employer's verdict on a pending application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub const fn target_status(self) -> ApplicationStatus {
        match self {
            Self::Accept => ApplicationStatus::Accepted,
            Self::Reject => ApplicationStatus::Rejected,
        }
    }
}

/// A candidate's claim against one job posting. Jointly referenced by the
/// candidate and the job's owner but owned by neither; entries are never
/// deleted by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub candidate_id: PrincipalId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_is_the_only_non_terminal_status() {
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(ApplicationStatus::Accepted.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());
    }

    #[test]
    fn decisions_map_to_terminal_statuses() {
        assert_eq!(Decision::Accept.target_status(), ApplicationStatus::Accepted);
        assert_eq!(Decision::Reject.target_status(), ApplicationStatus::Rejected);
        assert!(Decision::Accept.target_status().is_terminal());
    }
}
