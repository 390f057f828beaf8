//! Book management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    models::book::{BookDetails, CreateBook},
};

use super::{AuthenticatedUser, Pagination};

/// Create a new book. Every referenced author id must exist.
#[utoipa::path(
    post,
    path = "/book/create",
    tag = "books",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookDetails),
        (status = 400, description = "Some authors were not found"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(book): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<BookDetails>)> {
    claims.require_admin()?;

    let created = state.services.catalog.create_book(book).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List books with offset pagination
#[utoipa::path(
    get,
    path = "/book/get",
    tag = "books",
    params(Pagination),
    responses(
        (status = 200, description = "List of books", body = Vec<BookDetails>)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<BookDetails>>> {
    let books = state
        .services
        .catalog
        .list_books(pagination.skip(), pagination.limit())
        .await?;

    Ok(Json(books))
}

/// Get book by ID with its authors and outstanding loans
#[utoipa::path(
    get,
    path = "/book/get/{book_id}",
    tag = "books",
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<BookDetails>> {
    let book = state.services.catalog.get_book(book_id).await?;
    Ok(Json(book))
}

/// Update a book, replacing all scalar fields and the full author set
#[utoipa::path(
    put,
    path = "/book/update/{book_id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    request_body = CreateBook,
    responses(
        (status = 200, description = "Book updated", body = BookDetails),
        (status = 400, description = "Some authors were not found"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
    Json(book): Json<CreateBook>,
) -> AppResult<Json<BookDetails>> {
    claims.require_admin()?;

    let updated = state.services.catalog.update_book(book_id, book).await?;
    Ok(Json(updated))
}

/// Delete a book. Refused while loans are outstanding.
#[utoipa::path(
    delete,
    path = "/book/delete/{book_id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book has outstanding loans")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Value>> {
    claims.require_admin()?;

    state.services.catalog.delete_book(book_id).await?;

    Ok(Json(json!({ "detail": "Delete book", "ID": book_id.to_string() })))
}
