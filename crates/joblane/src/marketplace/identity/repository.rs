use super::domain::{Principal, PrincipalId};
use crate::marketplace::error::RepositoryError;

/// Storage abstraction for principals so the identity service can be
/// exercised in isolation.
///
/// `insert` must reject a duplicate email with `RepositoryError::Conflict`;
/// the uniqueness check and the write happen under one lock.
pub trait PrincipalRepository: Send + Sync {
    fn insert(&self, principal: Principal) -> Result<Principal, RepositoryError>;
    fn fetch(&self, id: &PrincipalId) -> Result<Option<Principal>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Principal>, RepositoryError>;
}
