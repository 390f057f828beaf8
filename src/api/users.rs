//! User administration and profile endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{AdminRegisterUser, UpdateProfile, UpdateUser, UserPublic},
};

use super::{AuthenticatedUser, Pagination};

/// List all users (admin)
#[utoipa::path(
    get,
    path = "/admin/users/get",
    tag = "users",
    security(("bearer_auth" = [])),
    params(Pagination),
    responses(
        (status = 200, description = "List of users", body = Vec<UserPublic>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<UserPublic>>> {
    claims.require_admin()?;

    let users = state
        .services
        .users
        .list_users(pagination.skip(), pagination.limit())
        .await?;

    Ok(Json(users.into_iter().map(|u| u.into_public()).collect()))
}

/// Create a user with an explicit role (admin)
#[utoipa::path(
    post,
    path = "/admin/register_new",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = AdminRegisterUser,
    responses(
        (status = 201, description = "User created", body = UserPublic),
        (status = 400, description = "Missing fields or email already registered"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn register_new(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(user): Json<AdminRegisterUser>,
) -> AppResult<(StatusCode, Json<UserPublic>)> {
    claims.require_admin()?;

    let created = state.services.users.register_new(user).await?;
    Ok((StatusCode::CREATED, Json(created.into_public())))
}

/// Replace every field of a user account (admin)
#[utoipa::path(
    put,
    path = "/admin/update_user/{user_id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserPublic),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
    Json(user): Json<UpdateUser>,
) -> AppResult<Json<UserPublic>> {
    claims.require_admin()?;
    user.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.services.users.update_user(user_id, user).await?;
    Ok(Json(updated.into_public()))
}

/// Update the authenticated user's own profile
#[utoipa::path(
    put,
    path = "/profile/update/",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserPublic),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn update_my_profile(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(profile): Json<UpdateProfile>,
) -> AppResult<Json<UserPublic>> {
    profile
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state
        .services
        .users
        .update_profile(claims.user_id, profile)
        .await?;

    Ok(Json(updated.into_public()))
}
