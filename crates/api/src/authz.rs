//! Route-level access policies.
//!
//! Handlers call [`authorize_operation`] first thing, before looking at the
//! body or the path, so a forbidden caller never learns whether its payload
//! or target was valid.

use rainforest_auth::{AccessPolicy, AuthzError, Principal, authorize};

/// Every guarded operation the API exposes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    CreateSpecies,
    ListSpecies,
    GetSpecies,
    UpdateSpecies,
    UpdateQuantity,
    DeleteSpecies,
    CreateUser,
    CurrentUser,
}

impl Operation {
    pub fn policy(self) -> AccessPolicy {
        match self {
            Operation::CreateSpecies
            | Operation::UpdateSpecies
            | Operation::DeleteSpecies
            | Operation::CreateUser => AccessPolicy::AdminOnly,
            Operation::ListSpecies
            | Operation::GetSpecies
            | Operation::UpdateQuantity
            | Operation::CurrentUser => AccessPolicy::AnyAuthenticated,
        }
    }
}

pub fn authorize_operation(principal: &Principal, operation: Operation) -> Result<(), AuthzError> {
    authorize(Some(principal), operation.policy()).map(|_| ())
}
