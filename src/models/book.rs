//! Book model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::author::Author;
use super::loan::Loan;

/// Book row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub publication: Option<NaiveDate>,
    pub style: Option<String>,
    /// Number of copies currently available for loan, never negative
    pub copies: i32,
}

/// Book with its authors and outstanding loans, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub publication: Option<NaiveDate>,
    pub style: Option<String>,
    pub copies: i32,
    pub authors: Vec<Author>,
    pub loans: Vec<Loan>,
}

impl BookDetails {
    pub fn from_parts(book: Book, authors: Vec<Author>, loans: Vec<Loan>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            description: book.description,
            publication: book.publication,
            style: book.style,
            copies: book.copies,
            authors,
            loans,
        }
    }
}

/// Create/update book request. Updates replace all scalar fields and the
/// full author set.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBook {
    pub title: String,
    pub description: Option<String>,
    pub publication: Option<NaiveDate>,
    /// Author ids, every one must exist
    pub authors: Vec<i32>,
    pub style: Option<String>,
    /// Defaults to a single copy
    pub copies: Option<i32>,
}
