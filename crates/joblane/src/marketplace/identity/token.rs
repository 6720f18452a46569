use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::domain::PrincipalId;
use crate::config::AuthConfig;

/// Opaque bearer credentials handed to the caller at login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
    kind: TokenKind,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("bearer credential expired")]
    Expired,
    #[error("bearer credential invalid")]
    Invalid,
}

/// Signs and verifies the HS256 bearer credentials used at the
/// authentication boundary. The marketplace core never sees raw tokens;
/// everything past this module works with resolved principals.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.token_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.token_secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_ttl_minutes),
            refresh_ttl: Duration::minutes(config.refresh_ttl_minutes),
        }
    }

    pub fn issue(&self, principal: &PrincipalId) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.sign(principal, TokenKind::Access, self.access_ttl)?,
            refresh: self.sign(principal, TokenKind::Refresh, self.refresh_ttl)?,
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<PrincipalId, TokenError> {
        self.verify(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<PrincipalId, TokenError> {
        self.verify(token, TokenKind::Refresh)
    }

    fn sign(
        &self,
        principal: &PrincipalId,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: principal.0.clone(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            kind,
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|_| TokenError::Invalid)
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<PrincipalId, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        if data.claims.kind != expected {
            return Err(TokenError::Invalid);
        }

        Ok(PrincipalId(data.claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            token_secret: "unit-test-secret".to_string(),
            access_ttl_minutes: 5,
            refresh_ttl_minutes: 60,
        })
    }

    #[test]
    fn issued_access_token_round_trips() {
        let issuer = issuer();
        let id = PrincipalId("user-000001".to_string());
        let pair = issuer.issue(&id).expect("issue");
        assert_eq!(issuer.verify_access(&pair.access).expect("verify"), id);
    }

    #[test]
    fn refresh_token_is_rejected_as_access_credential() {
        let issuer = issuer();
        let pair = issuer
            .issue(&PrincipalId("user-000001".to_string()))
            .expect("issue");
        assert!(matches!(
            issuer.verify_access(&pair.refresh),
            Err(TokenError::Invalid)
        ));
        assert!(issuer.verify_refresh(&pair.refresh).is_ok());
    }

    #[test]
    fn garbage_token_is_invalid() {
        let issuer = issuer();
        assert!(matches!(
            issuer.verify_access("not-a-token"),
            Err(TokenError::Invalid)
        ));
    }
}
