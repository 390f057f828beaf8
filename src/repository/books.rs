//! Books repository for database operations

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookDetails, CreateBook},
        loan::Loan,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book row by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Get book with its authors and outstanding loans
    pub async fn get_details(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.get_by_id(id).await?;
        let authors = self.authors_of(id).await?;
        let loans = self.loans_of(id).await?;

        Ok(BookDetails::from_parts(book, authors, loans))
    }

    /// List books with offset pagination, each with authors and loans
    pub async fn list(&self, skip: i64, limit: i64) -> AppResult<Vec<BookDetails>> {
        let books =
            sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id OFFSET $1 LIMIT $2")
                .bind(skip)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        let mut details = Vec::with_capacity(books.len());
        for book in books {
            let authors = self.authors_of(book.id).await?;
            let loans = self.loans_of(book.id).await?;
            details.push(BookDetails::from_parts(book, authors, loans));
        }

        Ok(details)
    }

    /// Create a book and its author associations in one transaction.
    /// Every referenced author id must exist.
    pub async fn create(&self, book: &CreateBook) -> AppResult<BookDetails> {
        let mut tx = self.pool.begin().await?;

        let authors = Self::resolve_authors(&mut tx, &book.authors).await?;

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, description, publication, style, copies)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(book.description.as_deref())
        .bind(book.publication)
        .bind(book.style.as_deref())
        .bind(book.copies.unwrap_or(1))
        .fetch_one(&mut *tx)
        .await?;

        Self::link_authors(&mut tx, created.id, &book.authors).await?;

        tx.commit().await?;

        Ok(BookDetails::from_parts(created, authors, Vec::new()))
    }

    /// Replace all scalar fields and the full author set
    pub async fn update(&self, id: i32, book: &CreateBook) -> AppResult<BookDetails> {
        let mut tx = self.pool.begin().await?;

        let authors = Self::resolve_authors(&mut tx, &book.authors).await?;

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET title = $1, description = $2, publication = $3, style = $4, copies = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(book.description.as_deref())
        .bind(book.publication)
        .bind(book.style.as_deref())
        .bind(book.copies.unwrap_or(1))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::link_authors(&mut tx, id, &book.authors).await?;

        tx.commit().await?;

        let loans = self.loans_of(id).await?;

        Ok(BookDetails::from_parts(updated, authors, loans))
    }

    /// Delete a book. Refused while loans are outstanding.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if !exists {
            return Err(AppError::NotFound("Book not found".to_string()));
        }

        let outstanding: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE book_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if outstanding > 0 {
            return Err(AppError::Conflict("Book has outstanding loans".to_string()));
        }

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Authors of a book, in id order
    pub async fn authors_of(&self, book_id: i32) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT a.*
            FROM authors a
            JOIN book_authors ba ON ba.author_id = a.id
            WHERE ba.book_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// Outstanding loans of a book
    pub async fn loans_of(&self, book_id: i32) -> AppResult<Vec<Loan>> {
        let loans =
            sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE book_id = $1 ORDER BY id")
                .bind(book_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(loans)
    }

    /// Load the referenced authors, failing if any id is unknown
    async fn resolve_authors(
        tx: &mut Transaction<'_, Postgres>,
        author_ids: &[i32],
    ) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors WHERE id = ANY($1) ORDER BY id",
        )
        .bind(author_ids)
        .fetch_all(&mut **tx)
        .await?;

        if authors.len() != author_ids.len() {
            return Err(AppError::BadRequest(
                "Some authors were not found.".to_string(),
            ));
        }

        Ok(authors)
    }

    async fn link_authors(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        author_ids: &[i32],
    ) -> AppResult<()> {
        for author_id in author_ids {
            sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2)")
                .bind(book_id)
                .bind(author_id)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }
}
