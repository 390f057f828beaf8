//! Catalog service: author and book management

use crate::{
    error::AppResult,
    models::{
        author::{Author, CreateAuthor},
        book::{BookDetails, CreateBook},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Authors

    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        self.repository.authors.create(&author).await
    }

    pub async fn list_authors(&self, skip: i64, limit: i64) -> AppResult<Vec<Author>> {
        self.repository.authors.list(skip, limit).await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.authors.get_by_id(id).await
    }

    pub async fn update_author(&self, id: i32, author: CreateAuthor) -> AppResult<Author> {
        self.repository.authors.update(id, &author).await
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete(id).await
    }

    // Books

    pub async fn create_book(&self, book: CreateBook) -> AppResult<BookDetails> {
        self.repository.books.create(&book).await
    }

    pub async fn list_books(&self, skip: i64, limit: i64) -> AppResult<Vec<BookDetails>> {
        self.repository.books.list(skip, limit).await
    }

    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        self.repository.books.get_details(id).await
    }

    pub async fn update_book(&self, id: i32, book: CreateBook) -> AppResult<BookDetails> {
        self.repository.books.update(id, &book).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }
}
