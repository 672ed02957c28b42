use thiserror::Error;

use crate::Principal;

/// Who may invoke an operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any caller holding a valid token.
    AnyAuthenticated,
    /// Only callers with the ADMIN role.
    AdminOnly,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: {0}")]
    Forbidden(String),
}

/// Authorize an (optionally) authenticated caller against a policy.
///
/// UNAUTHENTICATED → AUTHENTICATED{role} → AUTHORIZED | FORBIDDEN.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: Option<&Principal>, policy: AccessPolicy) -> Result<&Principal, AuthzError> {
    let principal = principal.ok_or(AuthzError::Unauthenticated)?;

    match policy {
        AccessPolicy::AnyAuthenticated => Ok(principal),
        AccessPolicy::AdminOnly if principal.is_admin() => Ok(principal),
        AccessPolicy::AdminOnly => Err(AuthzError::Forbidden(format!(
            "role {} may not perform admin operations",
            principal.role
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use rainforest_core::UserId;

    #[test]
    fn anonymous_is_unauthenticated_for_every_policy() {
        assert_eq!(authorize(None, AccessPolicy::AnyAuthenticated), Err(AuthzError::Unauthenticated));
        assert_eq!(authorize(None, AccessPolicy::AdminOnly), Err(AuthzError::Unauthenticated));
    }

    #[test]
    fn staff_passes_any_authenticated_but_not_admin_only() {
        let staff = Principal::new(UserId::new(), Role::Staff);
        assert_eq!(authorize(Some(&staff), AccessPolicy::AnyAuthenticated), Ok(&staff));
        assert!(matches!(
            authorize(Some(&staff), AccessPolicy::AdminOnly),
            Err(AuthzError::Forbidden(_))
        ));
    }

    #[test]
    fn admin_passes_everything() {
        let admin = Principal::new(UserId::new(), Role::Admin);
        assert_eq!(authorize(Some(&admin), AccessPolicy::AdminOnly), Ok(&admin));
        assert_eq!(authorize(Some(&admin), AccessPolicy::AnyAuthenticated), Ok(&admin));
    }
}
