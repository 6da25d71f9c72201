//! Books repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use super::FOREIGN_KEY_VIOLATION;
use crate::{
    error::{AppError, AppResult},
    listing::{BookCriteria, Filter, Ordering, PageRequest},
    models::book::{Book, CreateBook, UpdateBook},
};

/// Book columns, qualified so that a join on `authors` stays unambiguous
const BOOK_COLUMNS: &str = "books.id, books.title, books.price, books.publication_date, \
                            books.author_id, books.created_at, books.updated_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// One page of books, plus the filtered total
    pub async fn list(
        &self,
        criteria: &BookCriteria,
        ordering: &Ordering,
        page: &PageRequest,
    ) -> AppResult<(Vec<Book>, i64)> {
        let filter = Filter::for_books(criteria);

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM books");
        filter.push_where(&mut count);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM books", BOOK_COLUMNS));
        if ordering.joins_authors() {
            select.push(" INNER JOIN authors ON authors.id = books.author_id");
        }
        filter.push_where(&mut select);
        ordering.push_order_by(&mut select);
        page.push_limit_offset(&mut select);

        tracing::debug!("Book listing query: {}", select.sql());

        let rows = select.build_query_as::<Book>().fetch_all(&self.pool).await?;
        Ok((rows, total))
    }

    /// All books of an author, by title
    pub async fn list_by_author(&self, author_id: i64) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE author_id = $1 ORDER BY title, id",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Create a book from a validated request
    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, price, publication_date, author_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(data.title.as_deref())
        .bind(data.price.map(|p| p.round_dp(2)))
        .bind(data.publication_date)
        .bind(data.author_id)
        .fetch_one(&self.pool)
        .await
        .map_err(missing_author)?;
        Ok(row)
    }

    /// Update the fields present in `data`
    pub async fn update(&self, id: i64, data: &UpdateBook) -> AppResult<Book> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE books SET updated_at = NOW()");
        if let Some(ref title) = data.title {
            qb.push(", title = ").push_bind(title.clone());
        }
        if let Some(price) = data.price {
            qb.push(", price = ").push_bind(price.round_dp(2));
        }
        if let Some(publication_date) = data.publication_date {
            qb.push(", publication_date = ").push_bind(publication_date);
        }
        if let Some(author_id) = data.author_id {
            qb.push(", author_id = ").push_bind(author_id);
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<Book>()
            .fetch_optional(&self.pool)
            .await
            .map_err(missing_author)?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Delete book
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}

/// The author vanished between the existence check and the write
fn missing_author(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = error {
        if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return AppError::invalid_field(
                "author_id",
                "exists",
                "The selected author does not exist.",
            );
        }
    }
    AppError::Database(error)
}
