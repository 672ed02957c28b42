//! Bearer token signing and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};
use crate::Principal;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Verifies a bearer token and yields its claims.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError>;
}

/// Symmetric HS256 signer/validator sharing one secret.
#[derive(Clone)]
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256Jwt {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `principal`, valid from `now` for the configured TTL.
    pub fn issue(&self, principal: Principal, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = JwtClaims::new(principal, now, self.ttl);
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }
}

impl core::fmt::Debug for Hs256Jwt {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256Jwt")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl JwtValidator for Hs256Jwt {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        // Time checks run against the caller's clock in `validate_claims`.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &validation)
            .map_err(|e| TokenError::Invalid(e.to_string()))?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use rainforest_core::UserId;

    fn signer() -> Hs256Jwt {
        Hs256Jwt::new(b"test-secret", Duration::minutes(10))
    }

    #[test]
    fn issued_token_validates_to_same_principal() {
        let jwt = signer();
        let principal = Principal::new(UserId::new(), Role::Admin);
        let now = Utc::now();

        let token = jwt.issue(principal, now).unwrap();
        let claims = jwt.validate(&token, now).unwrap();

        assert_eq!(claims.principal(), principal);
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = signer();
        let issued = Utc::now() - Duration::hours(1);
        let token = jwt.issue(Principal::new(UserId::new(), Role::Staff), issued).unwrap();

        let err = jwt.validate(&token, Utc::now()).unwrap_err();
        assert_eq!(err, TokenError::Claims(TokenValidationError::Expired));
    }

    #[test]
    fn foreign_secret_is_rejected() {
        let token = Hs256Jwt::new(b"other-secret", Duration::minutes(10))
            .issue(Principal::new(UserId::new(), Role::Admin), Utc::now())
            .unwrap();

        assert!(matches!(signer().validate(&token, Utc::now()), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(signer().validate("not.a.jwt", Utc::now()), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn debug_redacts_secret() {
        assert!(format!("{:?}", signer()).contains("<redacted>"));
    }
}
