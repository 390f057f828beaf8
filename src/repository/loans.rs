//! Loans repository: the take/return engine.
//!
//! Both operations run inside a single transaction with row-level locks so
//! concurrent requests cannot drive `copies` negative or push a user past
//! the loan limit. Locks are always taken user row first, then book row;
//! the fixed order keeps concurrent takes deadlock-free.

use chrono::{Duration, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::{book::Book, loan::Loan},
};

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Postgres>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Borrow one copy of a book: decrement `copies` and insert the loan
    /// row together, or fail without touching either. Copy availability
    /// is checked before the per-user limit.
    pub async fn take(&self, user_id: i32, book_id: i32, policy: &LoansConfig) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        // Serializes this user's takes; also rejects tokens whose account
        // no longer exists.
        let user_row: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        if user_row.is_none() {
            return Err(AppError::Authentication("User not found".to_string()));
        }

        // Serializes takes of this book.
        let book = sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let new_copies = book.copies - 1;
        if new_copies < 0 {
            return Err(AppError::Authorization(
                "Not enough copies of books.".to_string(),
            ));
        }

        // All loans count toward the limit, overdue ones included.
        let loan_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        if loan_count >= policy.max_per_user {
            return Err(AppError::Authorization(format!(
                "User can't take more than {} books.",
                policy.max_per_user
            )));
        }

        let loan_date = Utc::now().date_naive();
        let return_date = loan_date + Duration::days(policy.period_days);

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (user_id, book_id, loan_date, return_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(loan_date)
        .bind(return_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET copies = $1 WHERE id = $2")
            .bind(new_copies)
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(loan)
    }

    /// Return a borrowed book: delete the caller's loan row and restore the
    /// copy count together. A loan held by another user is indistinguishable
    /// from no loan at all.
    pub async fn give_back(&self, user_id: i32, book_id: i32) -> AppResult<Loan> {
        let mut tx = self.pool.begin().await?;

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            SELECT * FROM loans
            WHERE user_id = $1 AND book_id = $2
            ORDER BY id
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Not found loans by user or book".to_string()))?;

        sqlx::query("DELETE FROM loans WHERE id = $1")
            .bind(loan.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE books SET copies = copies + 1 WHERE id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(loan)
    }
}
