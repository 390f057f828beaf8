//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, CreateAuthor},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// List authors with offset pagination
    pub async fn list(&self, skip: i64, limit: i64) -> AppResult<Vec<Author>> {
        let authors =
            sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY id OFFSET $1 LIMIT $2")
                .bind(skip)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?;

        Ok(authors)
    }

    /// Create a new author
    pub async fn create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (name, bio, bday) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&author.name)
        .bind(author.bio.as_deref())
        .bind(author.bday)
        .fetch_one(&self.pool)
        .await?;

        Ok(author)
    }

    /// Replace every field of an author
    pub async fn update(&self, id: i32, author: &CreateAuthor) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "UPDATE authors SET name = $1, bio = $2, bday = $3 WHERE id = $4 RETURNING *",
        )
        .bind(&author.name)
        .bind(author.bio.as_deref())
        .bind(author.bday)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Author not found".to_string()))
    }

    /// Delete an author. Book associations are dropped by the schema's
    /// ON DELETE CASCADE.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Author not found".to_string()));
        }

        Ok(())
    }
}
