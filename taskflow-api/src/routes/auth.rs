/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Login and get a token
///
/// Both success responses carry the user representation (never the password
/// hash) and a signed bearer token. Login failures use one error shape for
/// "no such email" and "wrong password", and the unknown-email path performs
/// the same password work as the verification path, so responses do not
/// reveal which emails are registered.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use taskflow_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Display name
    #[validate(length(min = 2, max = 50, message = "Name must be 2-50 characters"))]
    pub name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Authentication response (register and login)
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The user (password hash is never serialized)
    pub user: User,

    /// Signed bearer token
    pub token: String,
}

/// Register a new user
///
/// Creates a new user account and returns a signed token, so a freshly
/// registered user is immediately authenticated.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "Secret1A",
///   "name": "John Doe"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already exists
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    // Hash password
    let password_hash = password::hash_password(&req.password)?;

    // Create user; a duplicate email surfaces as a unique constraint
    // violation and maps to 409
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            password_hash,
            name: req.name,
        },
    )
    .await?;

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Login endpoint
///
/// Authenticates a user by email and password and returns a signed token.
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "Secret1A"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials (same response whether the
///   email is unknown or the password is wrong)
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = match User::find_by_email(&state.db, &req.email).await? {
        Some(user) => user,
        None => {
            // Unknown email: do the same password work as the verify path
            // so latency does not distinguish the two outcomes.
            password::mitigate_enumeration(&req.password);
            return Err(invalid_credentials());
        }
    };

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(invalid_credentials());
    }

    let token = issue_token(&state, &user)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse { user, token }))
}

fn issue_token(state: &AppState, user: &User) -> Result<String, ApiError> {
    let ttl = Duration::hours(state.config.jwt.ttl_hours);
    let claims = jwt::Claims::with_expiration(user.id, ttl);
    let token = jwt::create_token(&claims, state.jwt_secret())?;
    Ok(token)
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}
