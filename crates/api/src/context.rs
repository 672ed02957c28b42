use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use rainforest_auth::Principal;

use crate::app::errors::ApiError;

/// The authenticated caller, as placed in request extensions by
/// [`crate::middleware::auth_middleware`].
///
/// Rejects with 401 when the route was reached without the middleware.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CurrentPrincipal(pub Principal);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .map(CurrentPrincipal)
            .ok_or_else(|| ApiError::Unauthenticated("authentication required".to_string()))
    }
}
