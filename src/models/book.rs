//! Book model and request/response shapes

use chrono::{DateTime, SubsecRound, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Length of generated book ids
pub const BOOK_ID_LEN: usize = 15;

/// URL-safe alphabet used for book ids (64 symbols, 6 bits per character)
const BOOK_ID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Generate a random URL-safe book id
pub fn generate_book_id() -> String {
    let mut rng = rand::thread_rng();
    (0..BOOK_ID_LEN)
        .map(|_| BOOK_ID_ALPHABET[rng.gen_range(0..BOOK_ID_ALPHABET.len())] as char)
        .collect()
}

/// Current time truncated to millisecond precision
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Book record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    /// Total number of pages
    pub page_count: u32,
    /// Pages read so far, never greater than `page_count`
    pub read_page: u32,
    /// Set at creation when every page has been read
    pub finished: bool,
    pub reading: bool,
    pub inserted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Build a new record from a validated payload.
    pub fn from_payload(id: String, name: String, data: &BookPayload) -> Self {
        let inserted_at = now();
        Self {
            id,
            name,
            year: data.year,
            author: data.author.clone(),
            summary: data.summary.clone(),
            publisher: data.publisher.clone(),
            page_count: data.page_count,
            read_page: data.read_page,
            finished: data.page_count == data.read_page,
            reading: data.reading,
            inserted_at,
            updated_at: inserted_at,
        }
    }

    /// Replace the mutable fields. `finished` is left as computed at creation.
    pub fn apply(&mut self, name: String, data: &BookPayload) {
        self.name = name;
        self.year = data.year;
        self.author = data.author.clone();
        self.summary = data.summary.clone();
        self.publisher = data.publisher.clone();
        self.page_count = data.page_count;
        self.read_page = data.read_page;
        self.reading = data.reading;
        self.updated_at = now();
    }

    pub fn to_summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Short representation returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

/// Create / update book request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    /// Required; a missing or empty name is rejected by validation
    pub name: Option<String>,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

/// List query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// `1`/`true` or `0`/`false`
    pub reading: Option<String>,
    /// `1`/`true` or `0`/`false`
    pub finished: Option<String>,
}

impl BookQuery {
    /// Build the query from raw key/value pairs. A repeated key keeps its first
    /// value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "reading" => &mut query.reading,
                "finished" => &mut query.finished,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

/// The single filter applied by a list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    All,
    Name(String),
    /// `None` holds an unrecognised flag value, which matches nothing
    Reading(Option<bool>),
    Finished(Option<bool>),
}

impl From<&BookQuery> for BookFilter {
    /// Only the first supplied parameter counts: name, then reading, then finished.
    fn from(query: &BookQuery) -> Self {
        if let Some(name) = &query.name {
            BookFilter::Name(name.to_lowercase())
        } else if let Some(reading) = &query.reading {
            BookFilter::Reading(parse_flag(reading))
        } else if let Some(finished) = &query.finished {
            BookFilter::Finished(parse_flag(finished))
        } else {
            BookFilter::All
        }
    }
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Name(needle) => book.name.to_lowercase().contains(needle.as_str()),
            BookFilter::Reading(flag) => *flag == Some(book.reading),
            BookFilter::Finished(flag) => *flag == Some(book.finished),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn payload(page_count: u32, read_page: u32) -> BookPayload {
        BookPayload {
            name: Some("Dicoding".to_string()),
            year: 2023,
            author: "A".to_string(),
            summary: "S".to_string(),
            publisher: "P".to_string(),
            page_count,
            read_page,
            reading: false,
        }
    }

    #[test]
    fn test_generate_book_id() {
        let id = generate_book_id();
        assert_eq!(id.len(), BOOK_ID_LEN);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));

        let ids: HashSet<String> = (0..1000).map(|_| generate_book_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_alphabet_has_no_duplicates() {
        let symbols: HashSet<&u8> = BOOK_ID_ALPHABET.iter().collect();
        assert_eq!(symbols.len(), 64);
    }

    #[test]
    fn test_from_payload_sets_finished_and_timestamps() {
        let book = Book::from_payload("x".into(), "Dicoding".into(), &payload(100, 100));
        assert!(book.finished);
        assert_eq!(book.inserted_at, book.updated_at);

        let book = Book::from_payload("y".into(), "Dicoding".into(), &payload(100, 20));
        assert!(!book.finished);
    }

    #[test]
    fn test_apply_keeps_finished() {
        let mut book = Book::from_payload("x".into(), "Dicoding".into(), &payload(100, 10));
        book.apply("Renamed".into(), &payload(50, 50));
        assert_eq!(book.name, "Renamed");
        assert_eq!(book.read_page, 50);
        assert!(!book.finished);
        assert!(book.updated_at >= book.inserted_at);
    }

    #[test]
    fn test_serialized_field_names() {
        let book = Book::from_payload("x".into(), "Dicoding".into(), &payload(100, 100));
        let value = serde_json::to_value(&book).unwrap();
        for key in ["id", "pageCount", "readPage", "insertedAt", "updatedAt", "finished"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_filter_precedence() {
        let query = BookQuery {
            name: Some("War".into()),
            reading: Some("1".into()),
            finished: Some("0".into()),
        };
        assert_eq!(BookFilter::from(&query), BookFilter::Name("war".into()));

        let query = BookQuery {
            name: None,
            reading: Some("0".into()),
            finished: Some("1".into()),
        };
        assert_eq!(BookFilter::from(&query), BookFilter::Reading(Some(false)));

        let query = BookQuery {
            finished: Some("true".into()),
            ..Default::default()
        };
        assert_eq!(BookFilter::from(&query), BookFilter::Finished(Some(true)));

        assert_eq!(BookFilter::from(&BookQuery::default()), BookFilter::All);
    }

    #[test]
    fn test_from_pairs_keeps_first_value() {
        let pairs = vec![
            ("name".to_string(), "a".to_string()),
            ("name".to_string(), "b".to_string()),
            ("page".to_string(), "2".to_string()),
            ("reading".to_string(), "1".to_string()),
        ];
        let query = BookQuery::from_pairs(pairs);
        assert_eq!(query.name.as_deref(), Some("a"));
        assert_eq!(query.reading.as_deref(), Some("1"));
        assert_eq!(query.finished, None);
    }

    #[test]
    fn test_flag_values() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("false"), Some(false));
        assert_eq!(parse_flag(""), None);
        assert_eq!(parse_flag("yes"), None);
    }

    #[test]
    fn test_unknown_flag_matches_nothing() {
        let book = Book::from_payload("x".into(), "Dicoding".into(), &payload(10, 10));
        assert!(!BookFilter::Finished(parse_flag("maybe")).matches(&book));
        assert!(BookFilter::Finished(parse_flag("1")).matches(&book));
    }
}
