//! Book catalog service

use std::collections::HashMap;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    listing::{Page, PageLimits, PageUrl},
    models::{
        author::Author,
        book::{Book, BookListQuery, BookResponse, CreateBook, UpdateBook},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    limits: PageLimits,
}

impl BooksService {
    pub fn new(repository: Repository, limits: PageLimits) -> Self {
        Self { repository, limits }
    }

    /// Filtered, sorted and paginated book listing
    pub async fn list(&self, query: &BookListQuery, url: &PageUrl) -> AppResult<Page<BookResponse>> {
        let criteria = query.criteria();
        let ordering = query.ordering();
        let page = query.page_request(self.limits);
        tracing::debug!(?criteria, ?ordering, ?page, "Listing books");

        let (books, total) = self.repository.books.list(&criteria, &ordering, &page).await?;
        let data = self.with_authors(books).await?;
        Ok(Page::new(data, total, &page, url))
    }

    /// Get a book with its author
    pub async fn get(&self, id: i64) -> AppResult<BookResponse> {
        let book = self.repository.books.get_by_id(id).await?;
        self.with_author(book).await
    }

    pub async fn create(&self, data: CreateBook) -> AppResult<BookResponse> {
        data.validate()?;
        if let Some(author_id) = data.author_id {
            self.ensure_author_exists(author_id).await?;
        }

        let book = self.repository.books.create(&data).await?;
        tracing::info!("Created book id={} author_id={}", book.id, book.author_id);
        self.with_author(book).await
    }

    pub async fn update(&self, id: i64, data: UpdateBook) -> AppResult<BookResponse> {
        data.validate()?;
        if let Some(author_id) = data.author_id {
            self.ensure_author_exists(author_id).await?;
        }

        let book = self.repository.books.update(id, &data).await?;
        tracing::info!("Updated book id={}", book.id);
        self.with_author(book).await
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book id={}", id);
        Ok(())
    }

    async fn ensure_author_exists(&self, author_id: i64) -> AppResult<()> {
        if self.repository.authors.exists(author_id).await? {
            Ok(())
        } else {
            Err(AppError::invalid_field(
                "author_id",
                "exists",
                "The selected author does not exist.",
            ))
        }
    }

    async fn with_author(&self, book: Book) -> AppResult<BookResponse> {
        let author = self.repository.authors.get_by_id(book.author_id).await?;
        Ok(BookResponse::new(book, Some(&author)))
    }

    /// Eager-load the authors of a page of books in a single query
    async fn with_authors(&self, books: Vec<Book>) -> AppResult<Vec<BookResponse>> {
        let mut ids: Vec<i64> = books.iter().map(|b| b.author_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let authors: HashMap<i64, Author> = self
            .repository
            .authors
            .get_many(&ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        Ok(books
            .into_iter()
            .map(|book| {
                let author = authors.get(&book.author_id);
                BookResponse::new(book, author)
            })
            .collect())
    }
}
