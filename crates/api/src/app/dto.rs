use serde::{Deserialize, Serialize};
use serde_json::Value;

use rainforest_auth::User;

// -------------------------
// Request DTOs
// -------------------------

/// `GET /api/species` query string. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct SpeciesQuery {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub status: Option<String>,
}

/// `PATCH /api/species/:id/quantity` body. The value is judged by the
/// inventory rules, so it stays untyped here.
#[derive(Debug, Default, Deserialize)]
pub struct QuantityRequest {
    #[serde(default)]
    pub quantity: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email.
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
