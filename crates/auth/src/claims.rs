use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rainforest_core::UserId;

use crate::{Principal, Role};

/// JWT claims model.
///
/// Timestamps travel as registered `iat`/`exp` claims (seconds since epoch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the authenticated user.
    pub sub: UserId,

    /// Role granted to the subject at issue time.
    pub role: Role,

    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl JwtClaims {
    pub fn new(principal: Principal, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            sub: principal.user_id,
            role: principal.role,
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.sub, self.role)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate JWT claims against `now`.
///
/// Signature verification happens before this, in [`crate::token`].
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn claims(iat: i64, exp: i64) -> JwtClaims {
        JwtClaims {
            sub: UserId::new(),
            role: Role::Staff,
            issued_at: at(iat),
            expires_at: at(exp),
        }
    }

    #[test]
    fn window_checks() {
        let c = claims(1_000, 2_000);
        assert_eq!(validate_claims(&c, at(1_500)), Ok(()));
        assert_eq!(validate_claims(&c, at(999)), Err(TokenValidationError::NotYetValid));
        assert_eq!(validate_claims(&c, at(2_000)), Err(TokenValidationError::Expired));
        assert_eq!(
            validate_claims(&claims(2_000, 2_000), at(2_000)),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn serializes_registered_claim_names() {
        let json = serde_json::to_value(claims(1_000, 2_000)).unwrap();
        assert_eq!(json["iat"], 1_000);
        assert_eq!(json["exp"], 2_000);
        assert_eq!(json["role"], "STAFF");
    }
}
