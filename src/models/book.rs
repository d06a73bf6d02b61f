//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::error::{BookError, BookResult};

/// A book is finished once every page has been read.
pub fn is_finished(read_page: u32, page_count: u32) -> bool {
    read_page == page_count
}

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    /// Total number of pages
    pub page_count: u32,
    /// Pages read so far, never above `page_count`
    pub read_page: u32,
    /// Derived from `read_page` and `page_count` on every write
    pub finished: bool,
    /// Whether the owner is currently reading this book
    pub reading: bool,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a fresh record stamped with `now`
    pub fn new(id: String, input: BookInput, now: DateTime<Utc>) -> Self {
        Self {
            id,
            finished: is_finished(input.read_page, input.page_count),
            name: input.name,
            year: input.year,
            author: input.author,
            summary: input.summary,
            publisher: input.publisher,
            page_count: input.page_count,
            read_page: input.read_page,
            reading: input.reading,
            inserted_at: now,
            updated_at: now,
        }
    }

    /// Overwrite every mutable field, keeping `id` and `inserted_at`
    pub fn apply(&mut self, input: BookInput, now: DateTime<Utc>) {
        self.finished = is_finished(input.read_page, input.page_count);
        self.name = input.name;
        self.year = input.year;
        self.author = input.author;
        self.summary = input.summary;
        self.publisher = input.publisher;
        self.page_count = input.page_count;
        self.read_page = input.read_page;
        self.reading = input.reading;
        self.updated_at = now.max(self.inserted_at);
    }

    pub fn to_summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Short representation used in list responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: Option<String>,
}

/// Create / update book request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_page_progress"))]
pub struct BookPayload {
    #[validate(required, length(min = 1))]
    pub name: Option<String>,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    /// Defaults to 0
    pub page_count: Option<u32>,
    /// Defaults to 0
    pub read_page: Option<u32>,
    /// Defaults to false
    pub reading: Option<bool>,
}

fn validate_page_progress(payload: &BookPayload) -> Result<(), ValidationError> {
    if payload.read_page.unwrap_or(0) > payload.page_count.unwrap_or(0) {
        return Err(ValidationError::new("read_page_exceeds_page_count"));
    }
    Ok(())
}

impl BookPayload {
    /// Check the payload and turn it into a typed input.
    ///
    /// A missing name is always reported before a page overflow.
    pub fn into_input(self) -> BookResult<BookInput> {
        if let Err(errors) = self.validate() {
            if errors.field_errors().contains_key("name") {
                return Err(BookError::MissingName);
            }
            return Err(BookError::ReadPageExceedsPageCount);
        }

        Ok(BookInput {
            name: self.name.unwrap_or_default(),
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count.unwrap_or(0),
            read_page: self.read_page.unwrap_or(0),
            reading: self.reading.unwrap_or(false),
        })
    }
}

/// Validated book fields, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct BookInput {
    pub name: String,
    pub year: Option<i32>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

/// Query parameters for listing books
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// "1" for books being read, "0" for the others
    pub reading: Option<String>,
    /// "1" for finished books, "0" for the others
    pub finished: Option<String>,
}

/// Single filter applied when listing books
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    All,
    Name(String),
    Reading(bool),
    Finished(bool),
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Name(needle) => book.name.to_lowercase().contains(&needle.to_lowercase()),
            BookFilter::Reading(reading) => book.reading == *reading,
            BookFilter::Finished(finished) => book.finished == *finished,
        }
    }
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("1") => Some(true),
        Some("0") => Some(false),
        _ => None,
    }
}

impl From<&BookQuery> for BookFilter {
    /// Only the highest priority filter is kept: name, then reading, then finished.
    fn from(query: &BookQuery) -> Self {
        if let Some(name) = query.name.as_deref().filter(|n| !n.is_empty()) {
            return BookFilter::Name(name.to_string());
        }
        if let Some(reading) = parse_flag(query.reading.as_deref()) {
            return BookFilter::Reading(reading);
        }
        if let Some(finished) = parse_flag(query.finished.as_deref()) {
            return BookFilter::Finished(finished);
        }
        BookFilter::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: Option<&str>, page_count: u32, read_page: u32) -> BookPayload {
        BookPayload {
            name: name.map(str::to_string),
            page_count: Some(page_count),
            read_page: Some(read_page),
            ..Default::default()
        }
    }

    #[test]
    fn test_is_finished() {
        assert!(is_finished(400, 400));
        assert!(is_finished(0, 0));
        assert!(!is_finished(100, 300));
    }

    #[test]
    fn test_missing_name_rejected() {
        assert_eq!(payload(None, 10, 5).into_input(), Err(BookError::MissingName));
        assert_eq!(payload(Some(""), 10, 5).into_input(), Err(BookError::MissingName));
    }

    #[test]
    fn test_name_checked_before_pages() {
        assert_eq!(payload(None, 10, 50).into_input(), Err(BookError::MissingName));
    }

    #[test]
    fn test_read_page_overflow_rejected() {
        assert_eq!(
            payload(Some("Dune"), 10, 11).into_input(),
            Err(BookError::ReadPageExceedsPageCount)
        );
    }

    #[test]
    fn test_read_page_without_page_count_rejected() {
        let payload = BookPayload {
            name: Some("Dune".into()),
            read_page: Some(9),
            ..Default::default()
        };
        assert_eq!(payload.into_input(), Err(BookError::ReadPageExceedsPageCount));
    }

    #[test]
    fn test_defaults_applied() {
        let input = BookPayload {
            name: Some("Dune".into()),
            ..Default::default()
        }
        .into_input()
        .unwrap();
        assert_eq!(input.page_count, 0);
        assert_eq!(input.read_page, 0);
        assert!(!input.reading);
        assert_eq!(input.publisher, None);
    }

    #[test]
    fn test_payload_camel_case() {
        let payload: BookPayload = serde_json::from_value(serde_json::json!({
            "name": "Dune",
            "pageCount": 400,
            "readPage": 12,
            "reading": true,
            "finished": true,
            "id": "ignored"
        }))
        .unwrap();
        assert_eq!(payload.page_count, Some(400));
        assert_eq!(payload.read_page, Some(12));
        assert_eq!(payload.reading, Some(true));
    }

    #[test]
    fn test_filter_priority() {
        let query = BookQuery {
            name: Some("war".into()),
            reading: Some("1".into()),
            finished: Some("0".into()),
        };
        assert_eq!(BookFilter::from(&query), BookFilter::Name("war".into()));

        let query = BookQuery {
            name: Some(String::new()),
            reading: Some("0".into()),
            finished: Some("1".into()),
        };
        assert_eq!(BookFilter::from(&query), BookFilter::Reading(false));

        let query = BookQuery {
            reading: Some("yes".into()),
            finished: Some("1".into()),
            ..Default::default()
        };
        assert_eq!(BookFilter::from(&query), BookFilter::Finished(true));

        let query = BookQuery {
            finished: Some("true".into()),
            ..Default::default()
        };
        assert_eq!(BookFilter::from(&query), BookFilter::All);
    }

    #[test]
    fn test_apply_keeps_identity() {
        let created = Utc::now();
        let input = payload(Some("Foundation"), 300, 100).into_input().unwrap();
        let mut book = Book::new("abc".into(), input, created);
        assert!(!book.finished);

        let later = created + chrono::Duration::seconds(5);
        let input = payload(Some("Foundation"), 300, 300).into_input().unwrap();
        book.apply(input, later);

        assert_eq!(book.id, "abc");
        assert_eq!(book.inserted_at, created);
        assert_eq!(book.updated_at, later);
        assert!(book.finished);
    }

    #[test]
    fn test_name_filter_case_insensitive() {
        let input = payload(Some("War and Peace"), 10, 0).into_input().unwrap();
        let book = Book::new("x".into(), input, Utc::now());
        assert!(BookFilter::Name("WAR".into()).matches(&book));
        assert!(!BookFilter::Name("dune".into()).matches(&book));
    }
}
