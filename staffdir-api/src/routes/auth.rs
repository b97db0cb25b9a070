/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/login` - Login and get a bearer token
use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use staffdir_shared::auth::{jwt, password};
use staffdir_shared::repo::AccountRepository;

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email address
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Account ID
    pub account_id: String,

    /// Resolved account role
    pub account_role: String,

    /// Access token (24h)
    pub access_token: String,
}

/// Login endpoint
///
/// Authenticates an account by email and password and returns a signed
/// bearer token carrying the account's role.
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    // A missing account and a wrong password answer identically
    let account = state
        .directory
        .repo()
        .find_by_email(req.email.trim().to_lowercase().as_str())
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &account.password_hash)
        .map_err(|e| ApiError::InternalError(format!("Password verification failed: {}", e)))?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(account.id, account.account_role.as_str());
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(account_id = %account.id, "login succeeded");

    Ok(Json(LoginResponse {
        account_id: account.id.to_string(),
        account_role: account.account_role.as_str().to_string(),
        access_token,
    }))
}
