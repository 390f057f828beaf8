//! Registration and login endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, LoginUser, Token, UserPublic},
};

/// Register a new reader account
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = CreateUser,
    responses(
        (status = 201, description = "Account created", body = UserPublic),
        (status = 400, description = "Invalid input or email already registered")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(user): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserPublic>)> {
    user.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.users.register(user).await?;
    Ok((StatusCode::CREATED, Json(created.into_public())))
}

/// Log in with email and password, returning a bearer token
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginUser,
    responses(
        (status = 200, description = "Token issued", body = Token),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(login): Json<LoginUser>,
) -> AppResult<Json<Token>> {
    let token = state
        .services
        .users
        .authenticate(&login.email, &login.password)
        .await?;

    Ok(Json(Token::bearer(token)))
}
