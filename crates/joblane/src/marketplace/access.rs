//! Access-scoped query layer for the application ledger.
//!
//! Listings here depend on who is asking, not just on filter parameters:
//! the layer routes a caller to the candidate-scoped or employer-scoped
//! view and never merges the two result sets, even for a dual-role
//! principal.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::marketplace::catalog::JobRepository;
use crate::marketplace::error::MarketplaceError;
use crate::marketplace::identity::{Principal, Role};
use crate::marketplace::ledger::{Application, ApplicationLedgerService, ApplicationRepository};

/// Which side of the ledger the caller wants to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationViewScope {
    Candidate,
    Employer,
}

impl ApplicationViewScope {
    const fn required_role(self) -> Role {
        match self {
            Self::Candidate => Role::Candidate,
            Self::Employer => Role::Employer,
        }
    }
}

/// Routes ledger listings by the caller's role capabilities.
pub struct ScopedQueries<J, A> {
    ledger: Arc<ApplicationLedgerService<J, A>>,
}

impl<J, A> ScopedQueries<J, A>
where
    J: JobRepository + 'static,
    A: ApplicationRepository + 'static,
{
    pub fn new(ledger: Arc<ApplicationLedgerService<J, A>>) -> Self {
        Self { ledger }
    }

    /// Return the ledger entries this principal is entitled to see.
    ///
    /// A principal holding neither role is denied outright. When `scope` is
    /// omitted it defaults to the principal's only role; a dual-role
    /// principal must name the view explicitly.
    pub fn applications_for(
        &self,
        principal: &Principal,
        scope: Option<ApplicationViewScope>,
    ) -> Result<Vec<Application>, MarketplaceError> {
        if principal.roles.is_empty() {
            return Err(MarketplaceError::Unauthorized(
                "a role is required to list applications",
            ));
        }

        let scope = match scope {
            Some(scope) => scope,
            None => self.implied_scope(principal)?,
        };

        if !principal.has_role(scope.required_role()) {
            return Err(MarketplaceError::Unauthorized(
                "requested view does not match the caller's roles",
            ));
        }

        match scope {
            ApplicationViewScope::Candidate => self.ledger.list_for_candidate(principal),
            ApplicationViewScope::Employer => self.ledger.list_for_employer(principal),
        }
    }

    fn implied_scope(
        &self,
        principal: &Principal,
    ) -> Result<ApplicationViewScope, MarketplaceError> {
        match (
            principal.has_role(Role::Candidate),
            principal.has_role(Role::Employer),
        ) {
            (true, false) => Ok(ApplicationViewScope::Candidate),
            (false, true) => Ok(ApplicationViewScope::Employer),
            // Dual-role callers must pick a side; the layer never merges.
            (true, true) => Err(MarketplaceError::Validation(
                "view must be 'candidate' or 'employer' for a dual-role principal".to_string(),
            )),
            (false, false) => Err(MarketplaceError::Unauthorized(
                "a role is required to list applications",
            )),
        }
    }
}
