use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use super::domain::{EmployerProfile, Principal, PrincipalId, Role, RoleSet};
use super::repository::PrincipalRepository;
use super::token::{TokenIssuer, TokenPair};
use crate::config::AuthConfig;
use crate::marketplace::error::{MarketplaceError, RepositoryError};

type HmacSha256 = Hmac<Sha256>;

const MIN_PASSWORD_LENGTH: usize = 8;

static PRINCIPAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_principal_id() -> PrincipalId {
    let id = PRINCIPAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    PrincipalId(format!("user-{id:06}"))
}

/// Inbound registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Keyed credential hashing for stored passwords.
#[derive(Clone)]
pub struct CredentialHasher {
    key: Vec<u8>,
}

impl CredentialHasher {
    pub fn new(secret: &str) -> Self {
        Self {
            key: secret.as_bytes().to_vec(),
        }
    }

    pub fn hash(&self, password: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("hmac accepts any key length");
        mac.update(password.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    pub fn verify(&self, password: &str, expected_hex: &str) -> bool {
        let Ok(expected) = hex::decode(expected_hex) else {
            return false;
        };
        let mut mac = HmacSha256::new_from_slice(&self.key).expect("hmac accepts any key length");
        mac.update(password.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }
}

/// Registration, credential verification, and principal lookups.
///
/// Identity performs no authorization logic; role checks stay pure
/// predicates on [`Principal`] consumed by the other components.
pub struct IdentityService<P> {
    repository: Arc<P>,
    hasher: CredentialHasher,
}

impl<P> IdentityService<P>
where
    P: PrincipalRepository + 'static,
{
    pub fn new(repository: Arc<P>, hasher: CredentialHasher) -> Self {
        Self { repository, hasher }
    }

    pub fn register(&self, registration: Registration) -> Result<Principal, MarketplaceError> {
        let email = registration.email.trim().to_ascii_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(MarketplaceError::Validation(
                "email must be a valid address".to_string(),
            ));
        }
        if registration.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(MarketplaceError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        let roles: RoleSet = registration.roles.into_iter().collect();

        let employer_profile = if roles.contains(Role::Employer) {
            let company_name = registration
                .company_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    MarketplaceError::Validation(
                        "employer registration requires a company name".to_string(),
                    )
                })?;
            Some(EmployerProfile {
                company_name: company_name.to_string(),
            })
        } else {
            None
        };

        let principal = Principal {
            id: next_principal_id(),
            email,
            credential_hash: self.hasher.hash(&registration.password),
            roles,
            employer_profile,
        };

        match self.repository.insert(principal) {
            Ok(stored) => Ok(stored),
            Err(RepositoryError::Conflict) => Err(MarketplaceError::Validation(
                "email already registered".to_string(),
            )),
            Err(other) => Err(other.into()),
        }
    }

    /// Verify a credential pair, yielding the matching principal.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<Principal, MarketplaceError> {
        let email = email.trim().to_ascii_lowercase();
        let principal = self
            .repository
            .find_by_email(&email)?
            .ok_or(MarketplaceError::InvalidCredential)?;

        if !self.hasher.verify(password, &principal.credential_hash) {
            return Err(MarketplaceError::InvalidCredential);
        }

        Ok(principal)
    }

    pub fn fetch(&self, id: &PrincipalId) -> Result<Principal, MarketplaceError> {
        self.repository
            .fetch(id)?
            .ok_or_else(|| MarketplaceError::NotFound {
                entity: "principal",
                id: id.0.clone(),
            })
    }
}

/// Authentication boundary: bearer-credential issuance and resolution.
///
/// Everything behind this type hands the marketplace an already-resolved
/// [`Principal`]; credential storage stays process-external.
pub struct IdentityGateway<P> {
    service: IdentityService<P>,
    tokens: TokenIssuer,
}

impl<P> IdentityGateway<P>
where
    P: PrincipalRepository + 'static,
{
    pub fn new(repository: Arc<P>, auth: &AuthConfig) -> Self {
        Self {
            service: IdentityService::new(repository, CredentialHasher::new(&auth.token_secret)),
            tokens: TokenIssuer::new(auth),
        }
    }

    pub fn register(&self, registration: Registration) -> Result<Principal, MarketplaceError> {
        self.service.register(registration)
    }

    /// Exchange an email/password pair for access and renewal credentials.
    pub fn login(&self, email: &str, password: &str) -> Result<TokenPair, MarketplaceError> {
        let principal = self.service.authenticate(email, password)?;
        self.tokens
            .issue(&principal.id)
            .map_err(|_| MarketplaceError::InvalidCredential)
    }

    /// Exchange a renewal credential for a fresh token pair.
    pub fn refresh(&self, token: &str) -> Result<TokenPair, MarketplaceError> {
        let id = self
            .tokens
            .verify_refresh(token)
            .map_err(|_| MarketplaceError::InvalidCredential)?;
        // The principal must still exist; a deleted account cannot renew.
        let principal = self
            .service
            .fetch(&id)
            .map_err(|_| MarketplaceError::InvalidCredential)?;
        self.tokens
            .issue(&principal.id)
            .map_err(|_| MarketplaceError::InvalidCredential)
    }

    /// Resolve an access credential to its principal.
    pub fn principal_for_bearer(&self, token: &str) -> Result<Principal, MarketplaceError> {
        let id = self
            .tokens
            .verify_access(token)
            .map_err(|_| MarketplaceError::InvalidCredential)?;
        self.service
            .fetch(&id)
            .map_err(|_| MarketplaceError::InvalidCredential)
    }
}
