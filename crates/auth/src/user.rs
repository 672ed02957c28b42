//! User accounts.
//!
//! Accounts exist only to authenticate operators of the inventory. The
//! password hash is carried on [`User`] for verification but never leaves the
//! process: it is skipped on serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rainforest_core::{DomainError, Entity, UserId};

use crate::password::{self, PasswordError};
use crate::{Principal, Role};

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn create(new: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            role: new.role,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.id, self.role)
    }

    /// Whether `login` names this account, by username or by email.
    pub fn answers_to(&self, login: &str) -> bool {
        let login = login.trim();
        self.username == login || self.email.eq_ignore_ascii_case(login)
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> UserId {
        self.id
    }

    fn label(&self) -> &str {
        &self.username
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// A validated account awaiting insertion; the password is already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl NewUser {
    /// Validate the identity fields and password, then hash the password.
    ///
    /// `cost` overrides the bcrypt cost (tests use a low one).
    pub async fn register(
        username: &str,
        email: &str,
        password: &str,
        role: Role,
        cost: Option<u32>,
    ) -> Result<Self, RegistrationError> {
        let (username, email) = validate_identity(username, email)?;
        password::validate_password(password)
            .map_err(|e| DomainError::invalid_field("password", e.to_string()))?;

        let password_hash = password::hash_password(password, cost).await?;

        Ok(Self {
            username,
            email,
            password_hash,
            role,
        })
    }
}

/// Normalize and check a username/email pair.
///
/// Usernames are trimmed; emails are trimmed and lowercased.
pub fn validate_identity(username: &str, email: &str) -> Result<(String, String), DomainError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(DomainError::validation("username is required"));
    }

    let email = email.trim();
    if email.is_empty() {
        return Err(DomainError::validation("email is required"));
    }
    if !email.contains('@') {
        return Err(DomainError::invalid_field("email", "invalid email format"));
    }

    Ok((username.to_string(), email.to_lowercase()))
}
