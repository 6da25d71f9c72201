//! Book model and related types

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::{
    author::{Author, AuthorSummary},
    not_blank,
};
use crate::listing::{BookCriteria, Ordering, PageLimits, PageRequest};

/// Full book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub price: Decimal,
    pub publication_date: NaiveDate,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub id: i64,
    pub title: String,
    /// Price with two decimals, serialized as a string
    #[schema(value_type = String, example = "25.99")]
    pub price: Decimal,
    pub publication_date: NaiveDate,
    pub author_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookResponse {
    pub fn new(book: Book, author: Option<&Author>) -> Self {
        Self {
            id: book.id,
            title: book.title,
            price: book.price,
            publication_date: book.publication_date,
            author_id: book.author_id,
            author: author.map(AuthorSummary::from),
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }
}

/// Upper price bound (999.99)
pub fn max_price() -> Decimal {
    Decimal::new(99999, 2)
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO || *price > max_price() {
        let mut error = ValidationError::new("price_range");
        error.message = Some("The price must be between 0 and 999.99.".into());
        return Err(error);
    }
    Ok(())
}

fn validate_not_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        let mut error = ValidationError::new("before_or_equal_today");
        error.message = Some("The publication date cannot be in the future.".into());
        return Err(error);
    }
    Ok(())
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(
        required(message = "The title is required."),
        length(min = 1, max = 255, message = "The title must be between 1 and 255 characters."),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "The price is required."),
        custom(function = "validate_price")
    )]
    #[schema(value_type = Option<f64>, example = 25.99)]
    pub price: Option<Decimal>,
    #[validate(
        required(message = "The publication date is required."),
        custom(function = "validate_not_future")
    )]
    pub publication_date: Option<NaiveDate>,
    #[validate(required(message = "The author is required."))]
    pub author_id: Option<i64>,
}

/// Update book request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBook {
    #[validate(
        length(min = 1, max = 255, message = "The title must be between 1 and 255 characters."),
        custom(function = "not_blank")
    )]
    pub title: Option<String>,
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<f64>, example = 25.99)]
    pub price: Option<Decimal>,
    #[validate(custom(function = "validate_not_future"))]
    pub publication_date: Option<NaiveDate>,
    pub author_id: Option<i64>,
}

/// Book list query parameters.
///
/// Numeric filters that do not parse are ignored.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookListQuery {
    /// Substring of the title or of the author's first or last name
    pub search: Option<String>,
    /// Restrict to one author
    pub author_id: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    pub max_price: Option<String>,
    /// One of `title`, `price`, `publication_date`, `author_name`, `created_at`, `updated_at`
    pub sort: Option<String>,
    /// `asc` (default) or `desc`
    pub direction: Option<String>,
    /// Page number (default: 1)
    pub page: Option<String>,
    /// Records per page (default: 15, max: 100)
    pub per_page: Option<String>,
}

impl BookListQuery {
    pub fn criteria(&self) -> BookCriteria {
        BookCriteria::from_params(
            self.search.as_deref(),
            self.author_id.as_deref(),
            self.min_price.as_deref(),
            self.max_price.as_deref(),
        )
    }

    pub fn ordering(&self) -> Ordering {
        Ordering::for_books(self.sort.as_deref(), self.direction.as_deref())
    }

    pub fn page_request(&self, limits: PageLimits) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.per_page.as_deref(), limits)
    }
}

/// Pagination-only query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (default: 1)
    pub page: Option<String>,
    /// Records per page (default: 15, max: 100)
    pub per_page: Option<String>,
}

impl PageQuery {
    pub fn page_request(&self, limits: PageLimits) -> PageRequest {
        PageRequest::from_params(self.page.as_deref(), self.per_page.as_deref(), limits)
    }
}
