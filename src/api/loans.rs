//! Loan endpoints: take and return a book

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::loan::{LoanDetails, ReturnReceipt},
};

use super::AuthenticatedUser;

/// Borrow one copy of a book for the authenticated user
#[utoipa::path(
    post,
    path = "/book/take/{book_id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Loan created", body = LoanDetails),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "No copies left or loan limit reached"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn take_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<LoanDetails>> {
    let loan = state.services.loans.take_book(&claims, book_id).await?;
    Ok(Json(loan))
}

/// Return a borrowed book
#[utoipa::path(
    delete,
    path = "/book/return/{book_id}",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = ReturnReceipt),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No loan by this user for this book")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<ReturnReceipt>> {
    let receipt = state.services.loans.return_book(&claims, book_id).await?;
    Ok(Json(receipt))
}
