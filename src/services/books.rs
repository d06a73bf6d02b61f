//! Book record service

use chrono::Utc;

use crate::{
    error::BookResult,
    models::book::{Book, BookFilter, BookPayload, BookSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate the payload and store a new book, returning its id
    pub fn create(&self, payload: BookPayload) -> BookResult<String> {
        let input = payload.into_input()?;
        Ok(self.repository.books.insert(input, Utc::now()))
    }

    /// List book summaries, narrowed by at most one filter
    pub fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        self.repository.books.list(filter)
    }

    pub fn get_by_id(&self, id: &str) -> BookResult<Book> {
        self.repository.books.get_by_id(id)
    }

    /// Validate the payload, then overwrite the book's fields
    pub fn update_by_id(&self, id: &str, payload: BookPayload) -> BookResult<()> {
        let input = payload.into_input()?;
        self.repository.books.update(id, input, Utc::now())
    }

    pub fn delete_by_id(&self, id: &str) -> BookResult<()> {
        self.repository.books.delete(id)
    }

    /// Number of books on the shelf
    pub fn count(&self) -> usize {
        self.repository.books.count()
    }
}
