//! Authors repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use super::FOREIGN_KEY_VIOLATION;
use crate::{
    error::{AppError, AppResult},
    listing::{AuthorCriteria, Filter, Ordering, PageRequest},
    models::author::{Author, AuthorWithCount, UpdateAuthor},
};

const AUTHOR_WITH_COUNT: &str = r#"
    SELECT authors.id, authors.first_name, authors.last_name,
           authors.created_at, authors.updated_at,
           (SELECT COUNT(*) FROM books WHERE books.author_id = authors.id) AS books_count
    FROM authors"#;

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// One page of authors with their book counts, plus the filtered total
    pub async fn list(
        &self,
        criteria: &AuthorCriteria,
        ordering: &Ordering,
        page: &PageRequest,
    ) -> AppResult<(Vec<AuthorWithCount>, i64)> {
        let filter = Filter::for_authors(criteria);

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM authors");
        filter.push_where(&mut count);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(AUTHOR_WITH_COUNT);
        filter.push_where(&mut select);
        ordering.push_order_by(&mut select);
        page.push_limit_offset(&mut select);

        let rows = select
            .build_query_as::<AuthorWithCount>()
            .fetch_all(&self.pool)
            .await?;
        Ok((rows, total))
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Get author by ID with its book count
    pub async fn get_with_count(&self, id: i64) -> AppResult<AuthorWithCount> {
        let mut qb = QueryBuilder::<Postgres>::new(AUTHOR_WITH_COUNT);
        qb.push(" WHERE authors.id = ").push_bind(id);
        qb.build_query_as::<AuthorWithCount>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM authors WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Load the authors with the given IDs, in no particular order
    pub async fn get_many(&self, ids: &[i64]) -> AppResult<Vec<Author>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Create author
    pub async fn create(&self, first_name: &str, last_name: &str) -> AppResult<Author> {
        let row = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update the fields present in `data`
    pub async fn update(&self, id: i64, data: &UpdateAuthor) -> AppResult<Author> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE authors SET updated_at = NOW()");
        if let Some(ref first_name) = data.first_name {
            qb.push(", first_name = ").push_bind(first_name.clone());
        }
        if let Some(ref last_name) = data.last_name {
            qb.push(", last_name = ").push_bind(last_name.clone());
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        qb.build_query_as::<Author>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Delete an author that owns no books.
    ///
    /// The author row is locked for the duration of the check so that a
    /// concurrent book insert (which takes a key-share lock on it) waits until
    /// the delete is committed, and then fails on the foreign key.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM authors WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }

        let books: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if books > 0 {
            return Err(AppError::AuthorHasBooks(id));
        }

        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| restrict_violation(e, id))?;

        tx.commit().await?;
        Ok(())
    }
}

fn restrict_violation(error: sqlx::Error, author_id: i64) -> AppError {
    if let sqlx::Error::Database(ref db) = error {
        if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return AppError::AuthorHasBooks(author_id);
        }
    }
    AppError::Database(error)
}
