//! In-memory book catalog

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::book::{Book, BookFilter, BookPayload, BookSummary};

/// Ordered collection of books, insertion order preserved.
///
/// Readers share the lock; every mutation holds the write guard from lookup
/// to completion.
#[derive(Clone, Default)]
pub struct BooksRepository {
    books: Arc<RwLock<Vec<Book>>>,
}

impl BooksRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a book at the end of the catalog
    pub async fn insert(&self, book: Book) {
        self.books.write().await.push(book);
    }

    /// Summaries of the books matching `filter`, in insertion order
    pub async fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        self.books
            .read()
            .await
            .iter()
            .filter(|book| filter.matches(book))
            .map(Book::to_summary)
            .collect()
    }

    /// First book with the given id
    pub async fn get_by_id(&self, id: &str) -> Option<Book> {
        self.books.read().await.iter().find(|book| book.id == id).cloned()
    }

    pub async fn exists(&self, id: &str) -> bool {
        self.books.read().await.iter().any(|book| book.id == id)
    }

    /// Replace the mutable fields of a book in place. Returns the updated record,
    /// or `None` when no book has this id.
    pub async fn update(&self, id: &str, name: String, data: &BookPayload) -> Option<Book> {
        let mut books = self.books.write().await;
        let book = books.iter_mut().find(|book| book.id == id)?;
        book.apply(name, data);
        Some(book.clone())
    }

    /// Remove a book, keeping the others in order. Returns `false` when no book has this id.
    pub async fn delete(&self, id: &str) -> bool {
        let mut books = self.books.write().await;
        match books.iter().position(|book| book.id == id) {
            Some(index) => {
                books.remove(index);
                true
            }
            None => false,
        }
    }

    pub async fn count(&self) -> usize {
        self.books.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::generate_book_id;

    fn book(name: &str, publisher: &str) -> Book {
        let data = BookPayload {
            name: Some(name.to_string()),
            year: 2020,
            author: "Author".to_string(),
            summary: "Summary".to_string(),
            publisher: publisher.to_string(),
            page_count: 10,
            read_page: 5,
            reading: true,
        };
        Book::from_payload(generate_book_id(), name.to_string(), &data)
    }

    #[tokio::test]
    async fn test_insert_preserves_order() {
        let repo = BooksRepository::new();
        repo.insert(book("First", "P1")).await;
        repo.insert(book("Second", "P2")).await;
        repo.insert(book("Third", "P3")).await;

        let names: Vec<String> = repo
            .list(&BookFilter::All)
            .await
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_delete_keeps_relative_order() {
        let repo = BooksRepository::new();
        let a = book("A", "P");
        let b = book("B", "P");
        let c = book("C", "P");
        let b_id = b.id.clone();
        repo.insert(a).await;
        repo.insert(b).await;
        repo.insert(c).await;

        assert!(repo.delete(&b_id).await);
        assert!(!repo.delete(&b_id).await);
        assert_eq!(repo.count().await, 2);

        let names: Vec<String> = repo
            .list(&BookFilter::All)
            .await
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[tokio::test]
    async fn test_get_and_exists() {
        let repo = BooksRepository::new();
        let stored = book("Dune", "Chilton");
        let id = stored.id.clone();
        repo.insert(stored.clone()).await;

        assert!(repo.exists(&id).await);
        assert_eq!(repo.get_by_id(&id).await, Some(stored));
        assert_eq!(repo.get_by_id("missing").await, None);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let repo = BooksRepository::new();
        let data = BookPayload {
            name: Some("X".into()),
            year: 1,
            author: String::new(),
            summary: String::new(),
            publisher: String::new(),
            page_count: 1,
            read_page: 0,
            reading: false,
        };
        assert!(repo.update("missing", "X".into(), &data).await.is_none());
    }
}
