//! Author management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    listing::{BookCriteria, Ordering, Page, PageLimits, PageUrl},
    models::{
        author::{AuthorListQuery, AuthorResponse, CreateAuthor, UpdateAuthor},
        book::{BookResponse, PageQuery},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    limits: PageLimits,
}

impl AuthorsService {
    pub fn new(repository: Repository, limits: PageLimits) -> Self {
        Self { repository, limits }
    }

    /// Filtered, sorted and paginated author listing with book counts
    pub async fn list(&self, query: &AuthorListQuery, url: &PageUrl) -> AppResult<Page<AuthorResponse>> {
        let criteria = query.criteria();
        let ordering = query.ordering();
        let page = query.page_request(self.limits);
        tracing::debug!(?criteria, ?ordering, ?page, "Listing authors");

        let (rows, total) = self.repository.authors.list(&criteria, &ordering, &page).await?;
        let data = rows.into_iter().map(AuthorResponse::from).collect();
        Ok(Page::new(data, total, &page, url))
    }

    /// Get an author with its book count and books
    pub async fn get(&self, id: i64) -> AppResult<AuthorResponse> {
        let row = self.repository.authors.get_with_count(id).await?;
        let books = self.repository.books.list_by_author(id).await?;

        let mut response = AuthorResponse::from(row);
        response.books = Some(books.into_iter().map(|b| BookResponse::new(b, None)).collect());
        Ok(response)
    }

    pub async fn create(&self, data: CreateAuthor) -> AppResult<AuthorResponse> {
        data.validate()?;
        let (Some(first_name), Some(last_name)) = (data.first_name.as_deref(), data.last_name.as_deref()) else {
            return Err(AppError::Internal("Validated author is missing a name".to_string()));
        };

        let author = self.repository.authors.create(first_name, last_name).await?;
        tracing::info!("Created author id={}", author.id);

        let mut response = AuthorResponse::from(author);
        response.books_count = Some(0);
        Ok(response)
    }

    pub async fn update(&self, id: i64, data: UpdateAuthor) -> AppResult<AuthorResponse> {
        data.validate()?;
        self.repository.authors.update(id, &data).await?;
        tracing::info!("Updated author id={}", id);

        let row = self.repository.authors.get_with_count(id).await?;
        Ok(AuthorResponse::from(row))
    }

    /// Delete an author; refused with `AUTHOR_HAS_BOOKS` while books remain
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        match self.repository.authors.delete(id).await {
            Ok(()) => {
                tracing::info!("Deleted author id={}", id);
                Ok(())
            }
            Err(AppError::AuthorHasBooks(id)) => {
                tracing::info!("Refused to delete author id={}: books still attached", id);
                Err(AppError::AuthorHasBooks(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Paginated books of one author, by title
    pub async fn list_books(&self, id: i64, query: &PageQuery, url: &PageUrl) -> AppResult<Page<BookResponse>> {
        let author = self.repository.authors.get_by_id(id).await?;

        let criteria = BookCriteria::for_author(id);
        let ordering = Ordering::for_books(None, None);
        let page = query.page_request(self.limits);

        let (books, total) = self.repository.books.list(&criteria, &ordering, &page).await?;
        let data = books
            .into_iter()
            .map(|book| BookResponse::new(book, Some(&author)))
            .collect();
        Ok(Page::new(data, total, &page, url))
    }
}
