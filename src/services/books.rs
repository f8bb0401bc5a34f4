//! Book catalog service

use crate::{
    error::{AppError, AppResult},
    models::book::{generate_book_id, Book, BookFilter, BookPayload, BookQuery, BookSummary},
    repository::Repository,
};

/// Operation a payload is validated for; selects the wording of failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BookAction {
    Add,
    Update,
}

impl BookAction {
    fn failure_prefix(self) -> &'static str {
        match self {
            BookAction::Add => "Gagal menambahkan buku",
            BookAction::Update => "Gagal memperbarui buku",
        }
    }
}

/// Check the payload and return the book name.
fn validate(data: &BookPayload, action: BookAction) -> AppResult<String> {
    let name = match data.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(AppError::Validation(format!(
                "{}. Mohon isi nama buku",
                action.failure_prefix()
            )))
        }
    };

    if data.read_page > data.page_count {
        return Err(AppError::Validation(format!(
            "{}. readPage tidak boleh lebih besar dari pageCount",
            action.failure_prefix()
        )));
    }

    Ok(name)
}

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Validate and append a new book, returning its id
    pub async fn add(&self, data: &BookPayload) -> AppResult<String> {
        let name = validate(data, BookAction::Add)?;

        let id = generate_book_id();
        self.repository
            .books
            .insert(Book::from_payload(id.clone(), name, data))
            .await;

        if !self.repository.books.exists(&id).await {
            return Err(AppError::Internal("Buku gagal ditambahkan".to_string()));
        }

        tracing::info!(book_id = %id, "Book added");
        Ok(id)
    }

    /// List book summaries; only the first supplied filter is applied
    pub async fn list(&self, query: &BookQuery) -> Vec<BookSummary> {
        let filter = BookFilter::from(query);
        let books = self.repository.books.list(&filter).await;
        tracing::debug!(?filter, count = books.len(), "Books listed");
        books
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Book> {
        self.repository
            .books
            .get_by_id(id)
            .await
            .ok_or_else(|| AppError::NotFound("Buku tidak ditemukan".to_string()))
    }

    /// Replace the mutable fields of a book.
    ///
    /// `finished` keeps the value computed when the book was added, even if
    /// the new page counts say otherwise.
    pub async fn update(&self, id: &str, data: &BookPayload) -> AppResult<Book> {
        let name = validate(data, BookAction::Update)?;

        let book = self
            .repository
            .books
            .update(id, name, data)
            .await
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{}. Id tidak ditemukan",
                    BookAction::Update.failure_prefix()
                ))
            })?;

        tracing::info!(book_id = %id, "Book updated");
        Ok(book)
    }

    /// Number of books in the catalog
    pub async fn count(&self) -> usize {
        self.repository.books.count().await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.repository.books.delete(id).await {
            return Err(AppError::NotFound(
                "Buku gagal dihapus. Id tidak ditemukan".to_string(),
            ));
        }
        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }
}
