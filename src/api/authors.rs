//! Author management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor},
};

use super::{AuthenticatedUser, Pagination};

/// Create a new author
#[utoipa::path(
    post,
    path = "/author/create",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(author): Json<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    claims.require_admin()?;

    let created = state.services.catalog.create_author(author).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List authors with offset pagination
#[utoipa::path(
    get,
    path = "/author/get",
    tag = "authors",
    params(Pagination),
    responses(
        (status = 200, description = "List of authors", body = Vec<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<Author>>> {
    let authors = state
        .services
        .catalog
        .list_authors(pagination.skip(), pagination.limit())
        .await?;

    Ok(Json(authors))
}

/// Get author by ID
#[utoipa::path(
    get,
    path = "/author/get/{author_id}",
    tag = "authors",
    params(
        ("author_id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author details", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(author_id): Path<i32>,
) -> AppResult<Json<Author>> {
    let author = state.services.catalog.get_author(author_id).await?;
    Ok(Json(author))
}

/// Update an author, replacing every field
#[utoipa::path(
    put,
    path = "/author/update/{author_id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("author_id" = i32, Path, description = "Author ID")
    ),
    request_body = CreateAuthor,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(author_id): Path<i32>,
    Json(author): Json<CreateAuthor>,
) -> AppResult<Json<Author>> {
    claims.require_admin()?;

    let updated = state
        .services
        .catalog
        .update_author(author_id, author)
        .await?;

    Ok(Json(updated))
}

/// Delete an author
#[utoipa::path(
    delete,
    path = "/author/delete/{author_id}",
    tag = "authors",
    security(("bearer_auth" = [])),
    params(
        ("author_id" = i32, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Author deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Author not found")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(author_id): Path<i32>,
) -> AppResult<Json<Value>> {
    claims.require_admin()?;

    state.services.catalog.delete_author(author_id).await?;

    Ok(Json(json!({ "detail": "Delete author", "ID": author_id.to_string() })))
}
