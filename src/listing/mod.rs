//! Listing engine shared by the author and book list endpoints.
//!
//! A listing is composed in a fixed order: [`Filter`] predicates, then the
//! [`Ordering`], then the [`PageRequest`] limit/offset. The repositories feed
//! each stage into one `sqlx::QueryBuilder`.

pub mod filter;
pub mod pagination;
pub mod sort;

pub use filter::{AuthorCriteria, BookCriteria, Filter, Predicate};
pub use pagination::{Page, PageLimits, PageRequest, PageUrl};
pub use sort::{Direction, Ordering};
