//! Principals, role capabilities, and the authentication boundary.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod token;

pub use domain::{EmployerProfile, Principal, PrincipalId, PrincipalView, Role, RoleSet};
pub use repository::PrincipalRepository;
pub use router::auth_router;
pub use service::{CredentialHasher, IdentityGateway, IdentityService, Registration};
pub use token::{TokenError, TokenIssuer, TokenPair};
