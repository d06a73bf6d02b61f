//! Book collection kept in process memory

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rand::{distributions::Alphanumeric, Rng};

use crate::{
    error::{BookError, BookResult},
    models::book::{Book, BookFilter, BookInput, BookSummary},
};

const ID_LENGTH: usize = 16;

/// Ordered book collection; insertion order is the listing order.
///
/// Every method takes the lock once, so lookup and mutation never interleave
/// with another caller.
#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<Vec<Book>>>,
}

fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LENGTH)
        .map(char::from)
        .collect()
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new book and return its id
    pub fn insert(&self, input: BookInput, now: DateTime<Utc>) -> String {
        let mut books = self.books.write();

        let mut id = generate_id();
        while books.iter().any(|book| book.id == id) {
            id = generate_id();
        }

        books.push(Book::new(id.clone(), input, now));
        id
    }

    /// Summaries of the books matching `filter`, in insertion order
    pub fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        self.books
            .read()
            .iter()
            .filter(|book| filter.matches(book))
            .map(Book::to_summary)
            .collect()
    }

    pub fn get_by_id(&self, id: &str) -> BookResult<Book> {
        self.books
            .read()
            .iter()
            .find(|book| book.id == id)
            .cloned()
            .ok_or(BookError::BookNotFound)
    }

    /// Replace a book's fields in place
    pub fn update(&self, id: &str, input: BookInput, now: DateTime<Utc>) -> BookResult<()> {
        let mut books = self.books.write();
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(BookError::IdNotFound)?;
        book.apply(input, now);
        Ok(())
    }

    pub fn delete(&self, id: &str) -> BookResult<()> {
        let mut books = self.books.write();
        let index = books
            .iter()
            .position(|book| book.id == id)
            .ok_or(BookError::IdNotFound)?;
        books.remove(index);
        Ok(())
    }

    /// Number of books currently stored
    pub fn count(&self) -> usize {
        self.books.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn input(name: &str, publisher: &str) -> BookInput {
        BookInput {
            name: name.to_string(),
            year: Some(1965),
            author: None,
            summary: None,
            publisher: Some(publisher.to_string()),
            page_count: 10,
            read_page: 0,
            reading: false,
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let repo = BooksRepository::new();
        let ids: HashSet<String> = (0..200)
            .map(|i| repo.insert(input(&format!("Book {}", i), "Ace"), Utc::now()))
            .collect();
        assert_eq!(ids.len(), 200);
        assert!(ids.iter().all(|id| id.len() == ID_LENGTH));
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let repo = BooksRepository::new();
        let a = repo.insert(input("Dune", "Chilton"), Utc::now());
        let b = repo.insert(input("Emma", "Murray"), Utc::now());
        let c = repo.insert(input("Beloved", "Knopf"), Utc::now());

        let listed: Vec<String> = repo.list(&BookFilter::All).into_iter().map(|s| s.id).collect();
        assert_eq!(listed, vec![a.clone(), b, c.clone()]);

        repo.update(&a, input("Dune Messiah", "Putnam"), Utc::now()).unwrap();
        repo.delete(&c).unwrap();
        let listed = repo.list(&BookFilter::All);
        assert_eq!(listed[0].id, a);
        assert_eq!(listed[0].name, "Dune Messiah");
        assert_eq!(listed[0].publisher.as_deref(), Some("Putnam"));
        assert_eq!(listed.len(), 2);
    }

    #[test]
    fn test_missing_ids() {
        let repo = BooksRepository::new();
        assert_eq!(repo.get_by_id("nope"), Err(BookError::BookNotFound));
        assert_eq!(repo.update("nope", input("X", "Y"), Utc::now()), Err(BookError::IdNotFound));
        assert_eq!(repo.delete("nope"), Err(BookError::IdNotFound));
        assert_eq!(repo.count(), 0);
    }

    #[test]
    fn test_concurrent_writers() {
        let repo = BooksRepository::new();
        let threads = 8;
        let per_thread = 50;

        let ids: Vec<Vec<String>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let repo = repo.clone();
                    scope.spawn(move || {
                        let mut kept = Vec::new();
                        for i in 0..per_thread {
                            let id = repo.insert(input(&format!("Book {}-{}", t, i), "Ace"), Utc::now());
                            repo.update(&id, input(&format!("Read {}-{}", t, i), "Tor"), Utc::now())
                                .unwrap();
                            // every other book is removed again by its writer
                            if i % 2 == 0 {
                                repo.delete(&id).unwrap();
                                assert_eq!(repo.delete(&id), Err(BookError::IdNotFound));
                            } else {
                                kept.push(id);
                            }
                        }
                        kept
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let kept: Vec<String> = ids.into_iter().flatten().collect();
        let unique: HashSet<&String> = kept.iter().collect();
        assert_eq!(unique.len(), kept.len());
        assert_eq!(repo.count(), threads * per_thread / 2);

        for id in &kept {
            let book = repo.get_by_id(id).unwrap();
            assert!(book.name.starts_with("Read "));
            assert_eq!(book.publisher.as_deref(), Some("Tor"));
        }
    }

    #[test]
    fn test_clones_share_collection() {
        let repo = BooksRepository::new();
        let other = repo.clone();
        let id = repo.insert(input("Dune", "Chilton"), Utc::now());
        assert_eq!(other.get_by_id(&id).unwrap().name, "Dune");
        assert_eq!(other.count(), 1);
    }
}
