//! Loan (borrow) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::BookDetails;
use super::user::UserPublic;

/// Loan row from database. One outstanding borrow of one copy; deleted on
/// return, no history kept.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    /// Due date
    pub return_date: NaiveDate,
}

/// Loan enriched with borrower and book detail for the take response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoanDetails {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub loan_date: NaiveDate,
    pub return_date: NaiveDate,
    pub user: UserPublic,
    pub book: BookDetails,
}

impl LoanDetails {
    pub fn from_parts(loan: Loan, user: UserPublic, book: BookDetails) -> Self {
        Self {
            id: loan.id,
            user_id: loan.user_id,
            book_id: loan.book_id,
            loan_date: loan.loan_date,
            return_date: loan.return_date,
            user,
            book,
        }
    }
}

/// Return confirmation payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReturnReceipt {
    pub detail: String,
    pub book_id: i32,
    pub user_id: i32,
}
