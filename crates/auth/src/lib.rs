//! `rainforest-auth`: authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how
//! to hash passwords, sign and verify tokens, and decide whether a principal
//! may perform an operation, but not where users live or how requests arrive.

pub mod authorize;
pub mod claims;
pub mod password;
pub mod principal;
pub mod roles;
pub mod token;
pub mod user;

pub use authorize::{AccessPolicy, AuthzError, authorize};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use password::{PasswordError, hash_password, validate_password, verify_password};
pub use principal::Principal;
pub use roles::Role;
pub use token::{Hs256Jwt, JwtValidator, TokenError};
pub use user::{NewUser, RegistrationError, User, validate_identity};
