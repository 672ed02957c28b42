use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use tracing::{info, warn};

use rainforest_auth::{NewUser, Role, verify_password};

use crate::app::dto::{LoginRequest, LoginResponse, SignupRequest, UserResponse};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::{Operation, authorize_operation};
use crate::context::CurrentPrincipal;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Exchange a username (or email) and password for a bearer token.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = body?;

    let Some(user) = services.users.find_by_login(&request.username).await? else {
        warn!(login = %request.username, "login for unknown account");
        return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
    };

    if !verify_password(&request.password, &user.password_hash).await? {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
    }

    let token = services.jwt.issue(user.principal(), Utc::now())?;
    info!(user_id = %user.id, role = %user.role, "user logged in");

    Ok(Json(LoginResponse { token, user }))
}

/// Create an account. Admin only; role defaults to STAFF.
pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentPrincipal(principal): CurrentPrincipal,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    authorize_operation(&principal, Operation::CreateUser)?;

    let Json(request) = body?;
    let role = match request.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => raw.parse::<Role>()?,
        None => Role::Staff,
    };

    let new = NewUser::register(
        &request.username,
        &request.email,
        &request.password,
        role,
        services.bcrypt_cost,
    )
    .await?;
    let user = services.users.create(new).await?;

    info!(user_id = %user.id, actor = %principal.user_id, role = %user.role, "user created");
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<impl IntoResponse, ApiError> {
    authorize_operation(&principal, Operation::CurrentUser)?;

    let user = services
        .users
        .find_by_id(principal.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
