/// Profile endpoints for the authenticated user
///
/// The profile routes are self-referential: they always operate on the user
/// identified by the request's auth context, never on a user id from the
/// path or body. Email and password are not updatable here; the update
/// request simply has no such fields.
///
/// # Endpoints
///
/// - `GET /user/profile` - Current user's profile
/// - `PUT /user/profile` - Update name, bio, and/or avatar

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use taskflow_shared::{
    auth::middleware::AuthContext,
    models::user::{UpdateProfile, User},
};
use validator::Validate;

/// Profile response wrapper
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    /// The user (password hash is never serialized)
    pub user: User,
}

/// Profile update request
///
/// All fields optional; absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    /// New display name
    #[validate(length(min = 2, max = 50, message = "Name must be 2-50 characters"))]
    pub name: Option<String>,

    /// New bio
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,

    /// New avatar URL
    #[serde(rename = "avatar")]
    #[validate(url(message = "Avatar must be a valid URL"))]
    pub avatar_url: Option<String>,
}

/// Gets the authenticated user's profile
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token (rejected by middleware)
/// - `404 Not Found`: The account no longer exists
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse { user }))
}

/// Updates the authenticated user's profile
///
/// Only `name`, `bio`, and `avatar` are writable through this endpoint.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid token (rejected by middleware)
/// - `404 Not Found`: The account no longer exists
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<ProfileResponse>> {
    req.validate()?;

    let update = UpdateProfile {
        name: req.name,
        bio: req.bio,
        avatar_url: req.avatar_url,
    };

    let user = User::update_profile(&state.db, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::debug!(user_id = %user.id, "profile updated");

    Ok(Json(ProfileResponse { user }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_length_bounds() {
        let too_short = UpdateProfileRequest {
            name: Some("a".to_string()),
            bio: None,
            avatar_url: None,
        };
        assert!(too_short.validate().is_err());

        let minimal = UpdateProfileRequest {
            name: Some("ab".to_string()),
            bio: None,
            avatar_url: None,
        };
        assert!(minimal.validate().is_ok());
    }

    #[test]
    fn test_bio_max_length() {
        let too_long = UpdateProfileRequest {
            name: None,
            bio: Some("b".repeat(501)),
            avatar_url: None,
        };
        assert!(too_long.validate().is_err());
    }
}
