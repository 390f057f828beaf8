//! Loan management service

use crate::{
    config::LoansConfig,
    error::AppResult,
    models::{
        loan::{LoanDetails, ReturnReceipt},
        user::UserClaims,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// Borrow a book for the authenticated user. The response carries the
    /// loan with nested borrower and book detail.
    pub async fn take_book(&self, claims: &UserClaims, book_id: i32) -> AppResult<LoanDetails> {
        let loan = self
            .repository
            .loans
            .take(claims.user_id, book_id, &self.config)
            .await?;

        tracing::info!("{} take the book with ID: {}", claims.sub, book_id);

        // Re-read after commit for the enriched response.
        let user = self.repository.users.get_by_id(loan.user_id).await?;
        let book = self.repository.books.get_details(loan.book_id).await?;

        Ok(LoanDetails::from_parts(loan, user.into_public(), book))
    }

    /// Return a borrowed book
    pub async fn return_book(&self, claims: &UserClaims, book_id: i32) -> AppResult<ReturnReceipt> {
        let loan = self
            .repository
            .loans
            .give_back(claims.user_id, book_id)
            .await?;

        tracing::info!("{} return the book with ID: {}", claims.sub, book_id);

        Ok(ReturnReceipt {
            detail: "Returned book".to_string(),
            book_id: loan.book_id,
            user_id: loan.user_id,
        })
    }
}
